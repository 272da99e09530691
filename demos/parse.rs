use weatherman::parse_observations;

fn main() {
    let file = std::env::args().nth(1).expect("Missing filename");
    println!("opening {file}");
    let file = std::fs::File::open(file).unwrap();

    let days = parse_observations(file).unwrap();
    if days.is_empty() {
        println!("No observation found");
        return;
    }

    println!("{} days observed", days.len());
    println!(
        "Mean temp of the period: {:.1}",
        days.iter().map(|day| day.mean_temperature).sum::<f32>() / days.len() as f32
    );
}
