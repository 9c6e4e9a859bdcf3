#[tokio::main]
async fn main() {
    if let Err(err) = jsd_report_lib::run().await {
        log::error!("Report server stopped: {}", err);
        eprintln!("jsd-report-server: {}", err);
        std::process::exit(1);
    }
}
