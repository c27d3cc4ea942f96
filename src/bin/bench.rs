use log::info;

/// Prints the chart titles, or runs the chart whose title is given as the first argument
fn main() -> Result<(), hashlab::BenchError> {
    env_logger::builder().init();

    let Some(title) = std::env::args().nth(1) else {
        for title in hashlab::titles() {
            println!("{title}");
        }
        return Ok(());
    };

    info!("building chart {title:?}");
    let chart = hashlab::build(&title)?;
    print!("{chart}");
    Ok(())
}
