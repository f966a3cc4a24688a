#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::indexing_slicing)]

//! Measures lookup cost of both maps across load factors and plots it.

use hesh::{ChainedMap, OpenAddressedMap, logger::initialize_logger};
use log::info;
use plotters::prelude::*;
use rand::Rng;

/// Slots of the open-addressed table and buckets of the chained map
const TABLE_SIZE: usize = 1 << 16;
/// Number of load factors sampled between 0.1 and 0.9
const NUM_LOAD_FACTORS: usize = 9;
/// Threshold that keeps the open-addressed table from growing during the sweep
const SWEEP_LOAD_FACTOR_THRESHOLD: usize = 95;

const METHODS: [&str; 2] = ["Linear Probing", "Separate Chaining"];

/// Lookup cost of one map at one load factor
#[derive(Debug, Clone, Copy, Default)]
struct Sample {
    average: f64,
    worst: usize,
}

fn measure_open(keys: &[u64]) -> Sample {
    let mut map = OpenAddressedMap::with_capacity(TABLE_SIZE);
    map.set_load_factor_threshold(SWEEP_LOAD_FACTOR_THRESHOLD);
    for &key in keys {
        map.insert(key, ());
    }
    debug_assert_eq!(map.capacity(), TABLE_SIZE);

    let probes: Vec<usize> = keys.iter().filter_map(|key| map.probe_length(key)).collect();
    Sample {
        average: probes.iter().sum::<usize>() as f64 / probes.len().max(1) as f64,
        worst: probes.iter().copied().max().unwrap_or(0),
    }
}

fn measure_chained(keys: &[u64]) -> Sample {
    let mut map = ChainedMap::with_buckets(TABLE_SIZE);
    for &key in keys {
        map.insert(key, ());
    }

    // a successful lookup of the i-th node in a chain visits i nodes
    let lengths = map.bucket_lengths();
    let visited: usize = lengths.iter().map(|&len| len * (len + 1) / 2).sum();
    Sample {
        average: visited as f64 / map.len().max(1) as f64,
        worst: lengths.iter().copied().max().unwrap_or(0),
    }
}

fn draw_chart(
    path: &str,
    caption: &str,
    y_desc: &str,
    load_factors: &[f64],
    series: &[Vec<f64>],
) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = series.iter().flatten().fold(0.0_f64, |max, &y| max.max(y)) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (font_family, 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..max_y.max(1.0))?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc(y_desc)
        .axis_desc_style((font_family, 16))
        .draw()?;

    for ((method, values), color) in METHODS.iter().zip(series).zip(colors.iter()) {
        let line_style = ShapeStyle::from(color).stroke_width(2);
        chart
            .draw_series(LineSeries::new(
                load_factors.iter().copied().zip(values.iter().copied()),
                line_style,
            ))?
            .label(*method)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            load_factors
                .iter()
                .copied()
                .zip(values.iter().copied())
                .map(|point| Circle::new(point, 4, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    initialize_logger();

    let load_factors: Vec<f64> = (0..NUM_LOAD_FACTORS)
        .map(|i| 0.1 + 0.8 * (i as f64) / ((NUM_LOAD_FACTORS - 1) as f64))
        .collect();

    let mut rng = rand::rng();
    let max_keys = (TABLE_SIZE as f64 * 0.9) as usize;
    let keys: Vec<u64> = (0..max_keys).map(|_| rng.random()).collect();

    let mut average: Vec<Vec<f64>> = vec![Vec::new(); METHODS.len()];
    let mut worst: Vec<Vec<f64>> = vec![Vec::new(); METHODS.len()];

    for &load in &load_factors {
        let n_keys = ((TABLE_SIZE as f64 * load) as usize).min(keys.len());
        let sample_keys = keys.get(..n_keys).unwrap_or(keys.as_slice());

        let samples = [measure_open(sample_keys), measure_chained(sample_keys)];
        for (method_idx, sample) in samples.iter().enumerate() {
            if let Some(series) = average.get_mut(method_idx) {
                series.push(sample.average);
            }
            if let Some(series) = worst.get_mut(method_idx) {
                series.push(sample.worst as f64);
            }
        }

        info!(
            "load {load:.2} ({n_keys} keys): probing avg {:.2} worst {}, chaining avg {:.2} worst {}",
            samples[0].average, samples[0].worst, samples[1].average, samples[1].worst
        );
    }

    draw_chart(
        "average_lookup_cost.png",
        "Average Successful Lookup Cost",
        "Slots / nodes visited",
        &load_factors,
        &average,
    )?;
    draw_chart(
        "worst_case_lookup_cost.png",
        "Worst-Case Lookup Cost",
        "Longest probe / chain",
        &load_factors,
        &worst,
    )?;

    info!("wrote average_lookup_cost.png and worst_case_lookup_cost.png");
    Ok(())
}
