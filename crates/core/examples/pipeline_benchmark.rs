//! Lightweight tokenize/parse/build/emit benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p argline_core --example pipeline_benchmark --release`

use std::time::{Duration, Instant};

use argline_core::{ParseConfig, build_command, parse_line, parse_tree, tokenize};

fn time<F: FnMut()>(iterations: usize, mut f: F) -> Duration {
    let start = Instant::now();
    for _ in 0..iterations {
        f();
    }
    start.elapsed()
}

fn report(stage: &str, elapsed: Duration, iterations: usize) {
    println!(
        "  {stage:<9} total={:?}, per_iter={:.3} µs",
        elapsed,
        elapsed.as_secs_f64() * 1_000_000.0 / iterations as f64
    );
}

fn run_benchmark(label: &str, line: &str, iterations: usize) -> Result<(), String> {
    let config = ParseConfig::default();
    let tree = parse_tree(line).map_err(|e| format!("{label}: {e}"))?;
    let command = parse_line(line).map_err(|e| format!("{label}: {e}"))?;

    println!("Benchmark: {label}");
    println!("  input_bytes: {}", line.len());
    report("tokenize:", time(iterations, || drop(tokenize(line))), iterations);
    report("parse:", time(iterations, || drop(parse_tree(line))), iterations);
    report(
        "build:",
        time(iterations, || drop(build_command(&tree, &config))),
        iterations,
    );
    report(
        "emit:",
        time(iterations, || drop(command.to_command_line())),
        iterations,
    );
    Ok(())
}

fn main() -> Result<(), String> {
    let iterations = std::env::var("ARGLINE_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(10_000);

    let long_quoted = format!("say \"{}\"", "lorem ipsum \\u00e9 ".repeat(64));
    let many_args = format!("give {}", "item\\t42 ".repeat(200));
    let samples = [
        ("short", r#"echo "hello \u0041"  world"#.to_owned()),
        ("long_quoted", long_quoted),
        ("many_args", many_args),
    ];

    for (label, line) in &samples {
        run_benchmark(label, line, iterations)?;
    }

    Ok(())
}
