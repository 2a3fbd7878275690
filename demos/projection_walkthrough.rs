use meter_projection::locale::{format_date, format_reading, parse_date, parse_reading};
use meter_projection::*;

fn print_outcome(label: &str, outcome: &TargetOutcome) {
    match outcome {
        TargetOutcome::Projected(p) => println!(
            "   {:<8} {}  reading {:>10}  consumption {:>8}  days {:>4}  ({:?}{})",
            label,
            format_date(p.date),
            format_reading(p.reading, 3),
            format_reading(p.consumption, 3),
            p.elapsed_days,
            p.origin,
            if p.overflow_occurred { ", rollover" } else { "" }
        ),
        TargetOutcome::NotApplicable => println!("   {:<8} -", label),
        TargetOutcome::Failed(e) => println!("   {:<8} not projected: {}", label, e),
    }
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    println!("🔌 Meter Projection Walkthrough\n");
    println!("A six-digit electricity meter rolls over from 999.999 to 0 during the year.");
    println!("Both readings are projected to a mid-year date and half a year ahead.\n");

    let input = CalculationInput::new(
        parse_reading("999.500", 6, 3)?,
        parse_reading("3.150", 6, 3)?,
        parse_date("01.01.2025")?,
        parse_date("31.12.2025")?,
    )
    .with_between_date(parse_date("30.06.2025")?)
    .with_future_date(parse_date("30.06.2026")?);

    let scenarios = [
        ("Linear", MeterConfig::default()),
        (
            "Winter weighted",
            MeterConfig {
                winter_mode: true,
                ..MeterConfig::default()
            },
        ),
        (
            "Billing, unrounded",
            MeterConfig {
                billing_mode: true,
                display: DisplayConfig {
                    rounding_mode: RoundingMode::Unrounded,
                    fraction_digits: 3,
                },
                ..MeterConfig::default()
            },
        ),
    ];

    for (name, config) in &scenarios {
        let report = MeterCalculator::calculate(&input, config)?.rounded(&config.display);

        println!("📈 {}", name);
        println!(
            "   Total consumption {} over {} days{}",
            format_reading(report.total.consumption, 3),
            report.total.elapsed_days,
            if report.total.overflow_occurred { " (rollover)" } else { "" }
        );
        println!(
            "   Rates: summer {} / winter {} per day, average {}",
            format_reading(report.rates.summer_per_day, 3),
            format_reading(report.rates.winter_per_day, 3),
            format_reading(report.average_per_day, 3)
        );
        print_outcome("Between", &report.between);
        println!(
            "   {:<8} consumption {} over {} days",
            "Current",
            format_reading(report.current.consumption, 3),
            report.current.elapsed_days
        );
        print_outcome("Future", &report.future);
        println!();
    }

    println!("📋 Configuration schema:\n");
    println!("{}", MeterConfig::schema_as_json()?);

    Ok(())
}
