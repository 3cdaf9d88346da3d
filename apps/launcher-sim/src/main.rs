use launcher_sim::{run, SimOptions};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let options = SimOptions::from_args(std::env::args().skip(1))?;
    println!("=== snapdock launcher simulation ===");
    println!(
        "viewport {}x{}, scenario: {}",
        options.width,
        options.height,
        options.scenario.name()
    );
    println!();

    for report in run(&options)? {
        println!("{report}");
    }
    Ok(())
}
