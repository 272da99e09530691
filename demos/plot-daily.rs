use plotters::prelude::*;
use weatherman::{args::parse_year_month, Observation, ObservationLoader};

fn naive_date(day: &Observation) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(
        day.date.year(),
        day.date.month() as u32,
        day.date.day() as u32,
    )
    .unwrap_or_else(|| panic!("invalid date {:?}", day.date))
}

fn main() {
    let mut args = std::env::args().skip(1);
    let dir = args.next().expect("Missing directory");
    let period = args.next().expect("Missing YYYY/MM");
    let (year, month) = parse_year_month(&period).expect("Bad YYYY/MM");

    let mut days = ObservationLoader::new(dir).load_month(year, month).unwrap();
    if days.is_empty() {
        println!("No observation for {month} {year}");
        return;
    }
    // several files can cover the same month, plot them in order
    days.sort_by_key(|day| day.date);

    let output = format!("{year}_{:02}.png", month as u8);
    let first_date = naive_date(days.first().unwrap());
    let last_date = naive_date(days.last().unwrap());
    let low = days
        .iter()
        .map(|day| day.min_temperature)
        .min_by(|left, right| left.total_cmp(right))
        .unwrap();
    let high = days
        .iter()
        .map(|day| day.max_temperature)
        .max_by(|left, right| left.total_cmp(right))
        .unwrap();

    let root = BitMapBackend::new(&output, (1920, 1080)).into_drawing_area();
    root.fill(&WHITE).unwrap();
    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Temperatures in Lahore, {month} {year}"),
            ("sans-serif", 100).into_font(),
        )
        .margin(5)
        .x_label_area_size(80)
        .y_label_area_size(80)
        .build_cartesian_2d(first_date..last_date.succ_opt().unwrap(), low..high)
        .unwrap();

    chart.configure_mesh().draw().unwrap();

    let series: [(&str, fn(&Observation) -> f32, RGBColor); 3] = [
        ("Max temperature", |day| day.max_temperature, RED),
        ("Mean temperature", |day| day.mean_temperature, GREEN),
        ("Min temperature", |day| day.min_temperature, BLUE),
    ];
    for (label, retrieve, color) in series {
        chart
            .draw_series(LineSeries::new(
                days.iter().map(|day| (naive_date(day), retrieve(day))),
                color,
            ))
            .unwrap()
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .unwrap();

    root.present().unwrap();
    println!("Wrote {output}");
}
