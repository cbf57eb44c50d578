use std::env;
use std::process;
use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use chainman::{
    ChainResult, ChainRunner, FakerFixtures, OutputFormat, ReqwestTransport, RunReport,
    default_suite, render,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut base_url = String::from("http://localhost:3000");
    let mut format = OutputFormat::Text;
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => format = OutputFormat::Json,
            "--help" | "-h" => {
                println!("usage: chainman [BASE_URL] [--json]");
                return Ok(());
            }
            other => base_url = other.to_string(),
        }
    }

    let fixtures = FakerFixtures;
    let runner = Arc::new(ChainRunner::new(ReqwestTransport::new(base_url.as_str())));
    let chains = default_suite(&fixtures);

    // Chains are independent; run them concurrently and report in order.
    let mut tasks = tokio::task::JoinSet::new();
    for (index, chain) in chains.into_iter().enumerate() {
        let runner = Arc::clone(&runner);
        tasks.spawn(async move { (index, runner.run(&chain).await) });
    }

    let mut indexed: Vec<(usize, ChainResult)> = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined?;
        indexed.push((index, result?));
    }
    indexed.sort_by_key(|(index, _)| *index);
    let results: Vec<ChainResult> = indexed.into_iter().map(|(_, result)| result).collect();

    let rendered = render(&results, format);
    println!("{}", rendered.trim_end_matches('\n'));
    if !RunReport::from_results(&results).all_passed() {
        process::exit(1);
    }
    Ok(())
}
