use soli_graph::cli;

#[tokio::main]
async fn main() -> soli_graph::Result<()> {
    cli::main().await
}
