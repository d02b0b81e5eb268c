//! This module renders the chart images for walkthrough runs and the admin
//! dashboard.

use anyhow::Result;
use plotters::prelude::*;
use simuvida_core::analysis::{self, DecisionBreakdown, FleetStats};
use simuvida_schemas::impact::ImpactEstimate;

const IMPACT_CATEGORIES: [&str; 3] = ["CO₂ (kg)", "Agua (L)", "Residuos (kg)"];

// The same teal the historical bar charts used.
const BAR_COLOR: RGBColor = RGBColor(14, 116, 144);
const SCORE_COLOR: RGBColor = RGBColor(16, 185, 129);

/// Bar chart of the three impact magnitudes for one estimate.
pub fn plot_impact_breakdown(output_dir: &str, estimate: &ImpactEstimate) -> Result<()> {
    let path = format!("{}/1_impact_breakdown.png", output_dir);
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let values = [estimate.co2_kg, estimate.water_l, estimate.waste_kg];
    let y_max = values.iter().cloned().fold(0.0, f64::max).max(1.0) * 1.1;

    let mut chart = ChartBuilder::on(&root)
        .caption("Impacto por categoría", ("sans-serif", 50).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0u32..3u32, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(3)
        .x_label_formatter(&|x| {
            IMPACT_CATEGORIES
                .get(*x as usize)
                .map_or(String::new(), |s| s.to_string())
        })
        .y_desc("Magnitud")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .data(values.iter().enumerate().map(|(i, v)| (i as u32, *v))),
    )?;

    root.present()?;
    Ok(())
}

/// Line chart of the eco-score across the walkthrough steps, read back from
/// the session log CSV.
pub fn plot_score_progression(output_dir: &str, log_path: &str) -> Result<()> {
    let entries = analysis::read_session_log(log_path)?;
    if entries.is_empty() {
        println!("[Plotting] Warning: no session data to plot.");
        return Ok(());
    }

    let path = format!("{}/2_score_progression.png", output_dir);
    let root = BitMapBackend::new(&path, (1024, 512)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_step = entries.last().map_or(1, |e| e.step);

    let mut chart = ChartBuilder::on(&root)
        .caption("Puntuación ecológica por paso", ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(1u64..max_step.max(2), 0u32..100u32)?;

    chart
        .configure_mesh()
        .x_desc("Paso")
        .y_desc("Puntuación")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            entries.iter().map(|e| (e.step, e.score)),
            SCORE_COLOR.stroke_width(3),
        ))?
        .label("Eco-score")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], SCORE_COLOR.filled()));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Renders the four admin dashboard charts.
pub fn generate_dashboard_plots(
    output_dir: &str,
    stats: &FleetStats,
    breakdown: &DecisionBreakdown,
) -> Result<()> {
    println!("[Plotting] Generating dashboard charts...");

    plot_count_ranking(
        output_dir,
        "1_top_telefonos.png",
        "Teléfonos más registrados",
        &stats.top_phones,
    )?;
    plot_count_ranking(
        output_dir,
        "2_top_laptops.png",
        "Laptops más registradas",
        &stats.top_laptops,
    )?;

    let usage: Vec<(String, usize)> = breakdown
        .usage
        .iter()
        .map(|(label, count)| (label.to_string(), *count))
        .collect();
    plot_count_ranking(
        output_dir,
        "3_decisiones_uso.png",
        "Decisiones: tiempo de uso",
        &usage,
    )?;

    let end_of_life: Vec<(String, usize)> = breakdown
        .end_of_life
        .iter()
        .map(|(label, count)| (label.to_string(), *count))
        .collect();
    plot_count_ranking(
        output_dir,
        "4_decisiones_fin_de_vida.png",
        "Decisiones: fin de vida",
        &end_of_life,
    )?;

    println!("[Plotting] Dashboard charts have been saved to '{}'.", output_dir);
    Ok(())
}

fn plot_count_ranking(
    output_dir: &str,
    file_name: &str,
    caption: &str,
    ranked: &[(String, usize)],
) -> Result<()> {
    if ranked.is_empty() || ranked.iter().all(|(_, count)| *count == 0) {
        println!("[Plotting] Warning: no data for '{}'.", caption);
        return Ok(());
    }

    let path = format!("{}/{}", output_dir, file_name);
    let root = BitMapBackend::new(&path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_count = ranked.iter().map(|(_, c)| *c).max().unwrap_or(1) as u32;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 40).into_font())
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(40)
        .build_cartesian_2d(0u32..ranked.len() as u32, 0u32..max_count + 1)?;

    chart
        .configure_mesh()
        .x_labels(ranked.len())
        .x_label_formatter(&|x| {
            ranked
                .get(*x as usize)
                .map_or(String::new(), |(label, _)| label.clone())
        })
        .y_desc("Registros")
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BAR_COLOR.filled())
            .data(
                ranked
                    .iter()
                    .enumerate()
                    .map(|(i, (_, count))| (i as u32, *count as u32)),
            ),
    )?;

    root.present()?;
    Ok(())
}
