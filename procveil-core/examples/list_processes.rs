use procveil_core::{InventoryConfig, SearchMode, Session, SortDirection, SortKey};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let query = std::env::args().nth(1).unwrap_or_default();

    let mut session = Session::system(InventoryConfig::default());
    session.refresh(false);
    session.sort(SortKey::Name, SortDirection::Ascending);
    let view = session.search(&query, SearchMode::Fuzzy);

    let pids = view.visible_pids();
    println!("{} of {} processes match {:?}", pids.len(), view.len(), query);
    for row in view.visible_rows().take(20) {
        println!("{:>7}  {:<32} {}", row.pid, row.display_name, row.window_titles);
    }

    if let Some(&pid) = pids.first() {
        let detail = session.describe(pid)?;
        println!();
        println!("PID {}: {} ({})", detail.pid, detail.name, detail.status);
        println!("  user:    {}", detail.user.as_deref().unwrap_or("-"));
        println!("  cpu:     {:.1}%", detail.cpu_percent);
        println!("  memory:  {} KiB", detail.resident_bytes / 1024);
        if let Some(threads) = detail.thread_count {
            println!("  threads: {}", threads);
        }
        if let Some(exe) = &detail.exe_path {
            println!("  exe:     {}", exe.display());
        }
    }

    if let Some(e) = session.directory_error() {
        eprintln!("window titles unavailable: {}", e);
    }

    Ok(())
}
