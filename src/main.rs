//! # Runtime Benchmark Entry Point
//!
//! Runs the micro-benchmark suite against in-process collaborators.
//!
//! ## Modes
//! - **Once:** run every scenario, print the text report.
//! - **Export:** run once, write the CSV report to `BENCH_EXPORT_PATH`.
//! - **Serve:** HTTP trigger on `BENCH_HTTP_ADDR` (`/test`, `/test.txt`, `/report.json`, `/info`).
//! - **Info:** print runtime/platform metadata.
//!
//! `--once`, `--export` and `--serve` skip the interactive menu. When stdin is
//! closed the menu exits instead of re-running the default choice.

use std::{
    env,
    io::{stdin, stdout, BufRead, Write},
    sync::{atomic::Ordering, Arc},
};

use log::{error, info};

use runtime_bench::{
    advanced::{
        env_info::runtime_info,
        http_api::{start_api_server, SuiteFactory},
    },
    collaborators::{CacheStore, InMemoryCache, InMemoryPersonStore, PersistenceStore},
    engine::suite::{BenchmarkSuite, SuiteReport},
    utils::{config::BenchConfig, export::export_report_csv},
};

fn main() {
    env_logger::init();
    info!("=== RUNTIME BENCH START ===");

    let config = BenchConfig::from_env();
    let factory = suite_factory(&config);

    if let Some(flag) = env::args().nth(1) {
        match flag.as_str() {
            "--once" => print_report(&run_once(&factory)),
            "--export" => run_and_export(&factory, &config),
            "--serve" => serve_until_enter(&factory, &config),
            other => eprintln!("Unknown flag '{}'. Use --once, --export or --serve.", other),
        }
        return;
    }

    loop {
        let Some(choice) = prompt_menu() else {
            info!("stdin closed, leaving the menu");
            info!("=== RUNTIME BENCH FINISHED ===");
            return;
        };
        match choice.as_str() {
            "1" | "" => print_report(&run_once(&factory)),
            "2" => run_and_export(&factory, &config),
            "3" => serve_until_enter(&factory, &config),
            "4" => {
                for (k, v) in runtime_info() {
                    println!("{:<16} {}", k, v);
                }
            }
            "5" => {
                println!("Exiting. Goodbye!");
                info!("=== RUNTIME BENCH FINISHED ===");
                return;
            }
            other => println!("Unrecognized option '{}', please try again.", other),
        }
    }
}

// Collaborators are shared across runs; every run gets a fresh suite.
fn suite_factory(config: &BenchConfig) -> SuiteFactory {
    let persistence: Arc<dyn PersistenceStore> = Arc::new(InMemoryPersonStore::new());
    let cache: Arc<dyn CacheStore> = Arc::new(InMemoryCache::new());
    let config = config.clone();
    Arc::new(move || BenchmarkSuite::standard(persistence.clone(), cache.clone(), &config))
}

/// One trimmed line, or `None` on end of input or a read error.
fn read_choice(input: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim().to_string()),
    }
}

fn prompt_menu() -> Option<String> {
    println!("\n┌─────────────────────────────────────────────┐");
    println!("│     RUNTIME BENCHMARK                       │");
    println!("├─────────────────────────────────────────────┤");
    println!("│  1) Run suite once (text report)            │");
    println!("│  2) Run suite + export CSV                  │");
    println!("│  3) Serve over HTTP                         │");
    println!("│  4) Environment info                        │");
    println!("│  5) Exit                                    │");
    println!("└─────────────────────────────────────────────┘");
    print!("Select [1/2/3/4/5] (default: 1): ");
    let _ = stdout().flush();

    read_choice(&mut stdin().lock())
}

fn run_once(factory: &SuiteFactory) -> SuiteReport {
    let mut suite = factory();
    suite.run()
}

fn print_report(report: &SuiteReport) {
    println!("\n{}", report.to_text());
    let anomalies = report.anomalies().count();
    if anomalies > 0 {
        println!("{} anomalies recorded", anomalies);
    }
}

fn run_and_export(factory: &SuiteFactory, config: &BenchConfig) {
    let report = run_once(factory);
    print_report(&report);
    if let Err(e) = export_report_csv(&report, &config.export_path) {
        error!("Failed to export report to {:?}: {}", config.export_path, e);
    }
}

fn serve_until_enter(factory: &SuiteFactory, config: &BenchConfig) {
    let (handle, running, addr) = match start_api_server(&config.http_addr, factory.clone()) {
        Ok(parts) => parts,
        Err(e) => {
            error!("Failed to bind {}: {}", config.http_addr, e);
            return;
        }
    };

    println!("Serving on http://{}  (GET /test, /test.txt, /report.json, /info)", addr);
    print!("Press Enter to stop the server...");
    let _ = stdout().flush();
    // Without a terminal there is no Enter to wait for: serve until the process is killed.
    if read_choice(&mut stdin().lock()).is_none() {
        info!("[Server] stdin closed, serving until terminated");
        if handle.join().is_err() {
            error!("[Server] thread join failed");
        }
        return;
    }

    running.store(false, Ordering::Relaxed);
    match handle.join() {
        Ok(_) => info!("[Server] stopped"),
        Err(_) => error!("[Server] thread join failed"),
    }
}
