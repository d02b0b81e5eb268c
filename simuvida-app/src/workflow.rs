use crate::config::{self, CurrentUser, DataStore};
use crate::plotting;
use crate::report;
use anyhow::{bail, Context, Result};
use chrono::Datelike;
use simuvida_core::{
    analysis,
    error::SimuvidaError,
    estimator::{self, EstimateInputs},
    recommend,
    simulation::{builder::SessionBuilder, session::SimulationSession},
    store::DecisionJournal,
};
use simuvida_schemas::{
    account::Role,
    decision::{
        DecisionRecord, EndOfLifeAction, LifecycleChoice, LifecycleStage, UsagePeriod,
    },
    device::{DeviceKind, DeviceProfile},
    impact::ImpactEstimate,
};
use std::fs;
use std::path::Path;

const DEMO_PHONE_MODEL: &str = "Samsung Galaxy A14";
const DEMO_LAPTOP_MODEL: &str = "MacBook Air M2";

pub fn run_register(
    store: &mut DataStore,
    name: &str,
    email: &str,
    password: &str,
    admin_code: Option<&str>,
) -> Result<()> {
    let role = match admin_code {
        Some(code) if code == config::admin_code(&store.root) => Role::Admin,
        Some(_) => bail!("The admin code is not valid"),
        None => Role::User,
    };
    let now = chrono::Utc::now().timestamp();
    let account = store.accounts.register(name, email, password, role, now)?;
    config::save_session(&store.root, &account)?;
    println!("Account '{}' registered and signed in.", account.email);
    if account.is_admin() {
        println!("Admin privileges granted.");
    }
    Ok(())
}

pub fn run_login(store: &DataStore, email: &str, password: &str) -> Result<()> {
    let account = store.accounts.login(email, password)?;
    config::save_session(&store.root, account)?;
    println!("Signed in as '{}'.", account.name);
    Ok(())
}

pub fn run_logout(store: &DataStore) -> Result<()> {
    config::clear_session(&store.root)?;
    println!("Signed out.");
    Ok(())
}

pub fn run_add_device(
    store: &mut DataStore,
    user: &CurrentUser,
    kind: DeviceKind,
    model: &str,
    year: Option<i32>,
    materials: Option<String>,
) -> Result<()> {
    let owner = user
        .email
        .as_deref()
        .context("Sign in before registering a device")?;
    let now = chrono::Utc::now().timestamp();
    let device = store
        .devices
        .register(kind, model, year, materials, owner, now)?;
    println!(
        "Registered {} '{}' as {}.",
        device.kind.display_label(),
        device.model,
        device.device_id
    );
    Ok(())
}

pub fn run_list_devices(
    store: &DataStore,
    user: &CurrentUser,
    kind: Option<DeviceKind>,
    all: bool,
) -> Result<()> {
    let owner = if all && user.is_admin() {
        None
    } else {
        match user.email.as_deref() {
            Some(email) => Some(email),
            None => {
                println!("Sign in to list your devices.");
                return Ok(());
            }
        }
    };

    let devices = store.devices.visible_to(owner, kind);
    if devices.is_empty() {
        println!("No devices found.");
        return Ok(());
    }

    println!(
        "{:<10} {:<10} {:<26} {:<6} {:<8}",
        "ID", "Tipo", "Modelo", "Año", "Revisado"
    );
    for device in devices {
        println!(
            "{:<10} {:<10} {:<26} {:<6} {:<8}",
            device.device_id,
            device.kind.as_str(),
            device.model,
            device.year.map_or("-".to_string(), |y| y.to_string()),
            if device.reviewed { "sí" } else { "no" }
        );
    }
    Ok(())
}

pub fn run_remove_device(
    store: &mut DataStore,
    user: &CurrentUser,
    device_id: &str,
) -> Result<()> {
    let device = store.devices.get(device_id)?.clone();
    let owns_it = user.email.as_deref() == Some(device.owner_email.as_str());
    if !owns_it && !user.is_admin() {
        bail!("Only the owner or an admin can delete device '{}'", device_id);
    }
    store.devices.remove(device_id)?;
    store.decisions.forget_device(device_id)?;
    println!("Deleted {} '{}'.", device.device_id, device.model);
    Ok(())
}

/// Walks a registered device through the five lifecycle stages, recording the
/// decisions and exporting the certificate and charts.
pub fn run_simulation(
    store: &mut DataStore,
    user: &CurrentUser,
    device_id: &str,
    usage: Option<UsagePeriod>,
    end_of_life: Option<EndOfLifeAction>,
    output_dir: Option<String>,
) -> Result<()> {
    let device = store.devices.get(device_id)?.clone();
    let class = store
        .class_for(device.kind)
        .ok_or_else(|| SimuvidaError::DeviceClassNotFound(device.kind.as_str().to_string()))?
        .clone();

    let output_dir = prepare_output_dir(store, &device.model, output_dir)?;
    let log_path = Path::new(&output_dir).join("session.csv");

    println!(
        "\n--- [Workflow] Starting lifecycle walkthrough for '{}' ---",
        device.model
    );

    let mut session = SessionBuilder::new()
        .with_device(device.clone())
        .with_class(class.clone())
        .with_reference_year(chrono::Utc::now().year())
        .with_session_logging_to_file(log_path.to_str().unwrap())
        .build()?;

    walk_stages(&mut session, usage, end_of_life, Some(&mut store.decisions))?;

    let final_estimate = session.estimate();
    print_summary_report(
        &user.name,
        &device,
        &class.display_name,
        session.resolved_usage(),
        session.resolved_end_of_life(),
        &final_estimate,
    );

    export_certificate(
        &output_dir,
        &user.name,
        &device,
        &class.display_name,
        session.resolved_usage(),
        session.resolved_end_of_life(),
        &final_estimate,
    )?;
    plotting::plot_impact_breakdown(&output_dir, &final_estimate)?;
    plotting::plot_score_progression(&output_dir, log_path.to_str().unwrap())?;

    println!("\nWalkthrough complete. Results are in '{}'", output_dir);
    Ok(())
}

/// Same walkthrough over a predefined demo device. Nothing is persisted to
/// the registries.
pub fn run_demo(
    store: &DataStore,
    user: &CurrentUser,
    kind: DeviceKind,
    usage: Option<UsagePeriod>,
    end_of_life: Option<EndOfLifeAction>,
    output_dir: Option<String>,
) -> Result<()> {
    let class = store
        .class_for(kind)
        .ok_or_else(|| SimuvidaError::DeviceClassNotFound(kind.as_str().to_string()))?
        .clone();
    let model = match kind {
        DeviceKind::Phone => DEMO_PHONE_MODEL,
        DeviceKind::Laptop => DEMO_LAPTOP_MODEL,
    };
    let device = DeviceProfile {
        device_id: format!("DEMO-{}", kind.as_str().to_uppercase()),
        kind,
        model: model.to_string(),
        year: None,
        materials: None,
        owner_email: user.email.clone().unwrap_or_default(),
        reviewed: true,
        registered_at: chrono::Utc::now().timestamp(),
    };

    let output_dir = prepare_output_dir(store, model, output_dir)?;
    let log_path = Path::new(&output_dir).join("session.csv");

    println!(
        "\n--- [Workflow] Starting demo walkthrough for '{}' ---",
        model
    );

    let mut session = SessionBuilder::new()
        .with_device(device.clone())
        .with_class(class.clone())
        .with_reference_year(chrono::Utc::now().year())
        .with_session_logging_to_file(log_path.to_str().unwrap())
        .build()?;

    walk_stages(&mut session, usage, end_of_life, None)?;

    let final_estimate = session.estimate();
    print_summary_report(
        &user.name,
        &device,
        &class.display_name,
        session.resolved_usage(),
        session.resolved_end_of_life(),
        &final_estimate,
    );

    plotting::plot_impact_breakdown(&output_dir, &final_estimate)?;
    plotting::plot_score_progression(&output_dir, log_path.to_str().unwrap())?;

    println!("\nDemo complete. Results are in '{}'", output_dir);
    Ok(())
}

/// Recomputes a device's estimate from its journaled decisions and exports
/// the certificate again.
pub fn run_report(
    store: &DataStore,
    user: &CurrentUser,
    device_id: &str,
    output_dir: Option<String>,
) -> Result<()> {
    let device = store.devices.get(device_id)?.clone();
    let class = store.class_for(device.kind);
    let class_name = class
        .map(|c| c.display_name.clone())
        .unwrap_or_else(|| "Clase desconocida".to_string());

    let records = store.decisions.for_device(device_id);
    let (usage, end_of_life) = analysis::resolved_decisions(&records);

    let inputs = EstimateInputs {
        manufacture_year: device.year,
        usage,
        end_of_life,
    };
    let estimate = estimator::estimate_for_class(class, &inputs, chrono::Utc::now().year());

    let usage = usage.unwrap_or_default();
    let end_of_life = end_of_life.unwrap_or_default();
    print_summary_report(&user.name, &device, &class_name, usage, end_of_life, &estimate);

    let output_dir = prepare_output_dir(store, &device.model, output_dir)?;
    export_certificate(
        &output_dir,
        &user.name,
        &device,
        &class_name,
        usage,
        end_of_life,
        &estimate,
    )?;
    plotting::plot_impact_breakdown(&output_dir, &estimate)?;

    println!("\nCertificate saved to '{}'", output_dir);
    Ok(())
}

/// Console dashboard of the aggregate counts, admin only, plus its charts.
pub fn run_stats(store: &DataStore, user: &CurrentUser, output_dir: Option<String>) -> Result<()> {
    if !user.is_admin() {
        bail!("Account '{}' is not an administrator", user.name);
    }
    let stats = analysis::fleet_stats(store.devices.devices(), store.accounts.accounts());
    let breakdown = analysis::decision_breakdown(store.decisions.decisions());

    println!("\n--- [Admin] Fleet Dashboard ---");
    println!("========================================");
    println!("Dispositivos registrados: {}", stats.total_devices);
    println!("Cuentas registradas:      {}", stats.total_accounts);
    println!("Teléfonos:                {}", stats.phone_count);
    println!("Laptops:                  {}", stats.laptop_count);
    println!("Pendientes de revisión:   {}", stats.pending_review);

    println!("\nTeléfonos más registrados:");
    for (model, count) in &stats.top_phones {
        println!("  - {:<26} {}", model, count);
    }
    println!("\nLaptops más registradas:");
    for (model, count) in &stats.top_laptops {
        println!("  - {:<26} {}", model, count);
    }

    println!("\nDecisiones de uso:");
    for (label, count) in &breakdown.usage {
        println!("  - {:<10} {}", label, count);
    }
    println!("\nDecisiones de fin de vida:");
    for (label, count) in &breakdown.end_of_life {
        println!("  - {:<10} {}", label, count);
    }
    println!("========================================");

    let output_dir = prepare_output_dir(store, "admin_dashboard", output_dir)?;
    write_stats_csv(&output_dir, &stats, &breakdown)?;
    plotting::generate_dashboard_plots(&output_dir, &stats, &breakdown)?;

    println!("\nDashboard data and charts saved to '{}'", output_dir);
    Ok(())
}

fn write_stats_csv(
    output_dir: &str,
    stats: &analysis::FleetStats,
    breakdown: &analysis::DecisionBreakdown,
) -> Result<()> {
    let path = Path::new(output_dir).join("stats.csv");
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["metric", "value"])?;
    writer.write_record(["total_devices", &stats.total_devices.to_string()])?;
    writer.write_record(["total_accounts", &stats.total_accounts.to_string()])?;
    writer.write_record(["phone_count", &stats.phone_count.to_string()])?;
    writer.write_record(["laptop_count", &stats.laptop_count.to_string()])?;
    writer.write_record(["pending_review", &stats.pending_review.to_string()])?;
    for (model, count) in &stats.top_phones {
        writer.write_record([&format!("top_phone:{}", model), &count.to_string()])?;
    }
    for (model, count) in &stats.top_laptops {
        writer.write_record([&format!("top_laptop:{}", model), &count.to_string()])?;
    }
    for (label, count) in &breakdown.usage {
        writer.write_record([&format!("usage:{}", label), &count.to_string()])?;
    }
    for (label, count) in &breakdown.end_of_life {
        writer.write_record([&format!("end_of_life:{}", label), &count.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn walk_stages(
    session: &mut SimulationSession,
    usage: Option<UsagePeriod>,
    end_of_life: Option<EndOfLifeAction>,
    mut journal: Option<&mut DecisionJournal>,
) -> Result<()> {
    let device_id = session.device().device_id.clone();
    while let Some(stage) = session.current_stage() {
        println!("\n--- Etapa {}: {} ---", stage.number(), stage.title());
        match stage {
            LifecycleStage::Use => {
                let period = usage.unwrap_or_default();
                let estimate = session.choose_usage(period)?;
                if let Some(journal) = journal.as_deref_mut() {
                    record_choice(journal, &device_id, LifecycleChoice::Usage { period })?;
                }
                println!("{}", session.narrative(stage));
                print_estimate_line(&estimate);
            }
            LifecycleStage::EndOfLife => {
                let action = end_of_life.unwrap_or_default();
                let estimate = session.choose_end_of_life(action)?;
                if let Some(journal) = journal.as_deref_mut() {
                    record_choice(journal, &device_id, LifecycleChoice::EndOfLife { action })?;
                }
                println!("{}", session.narrative(stage));
                print_estimate_line(&estimate);
            }
            _ => println!("{}", session.narrative(stage)),
        }
        session.advance()?;
    }
    Ok(())
}

fn record_choice(
    journal: &mut DecisionJournal,
    device_id: &str,
    choice: LifecycleChoice,
) -> Result<()> {
    let record = DecisionRecord {
        device_id: device_id.to_string(),
        stage: choice.stage(),
        choice,
        recorded_at: chrono::Utc::now().timestamp(),
    };
    journal.record(record)?;
    Ok(())
}

fn export_certificate(
    output_dir: &str,
    user_name: &str,
    device: &DeviceProfile,
    class_name: &str,
    usage: UsagePeriod,
    end_of_life: EndOfLifeAction,
    estimate: &ImpactEstimate,
) -> Result<()> {
    let issued_on = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let certificate = report::certificate_markdown(
        user_name, device, class_name, usage, end_of_life, estimate, &issued_on,
    );
    let path = Path::new(output_dir).join("certificado.md");
    fs::write(&path, certificate)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    // Machine-readable twin of the certificate, in the historical shape.
    let json = analysis::estimate_report_json(estimate)?;
    let path = Path::new(output_dir).join("impact.json");
    fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn print_estimate_line(estimate: &ImpactEstimate) {
    println!(
        "Impacto actual: CO₂ {} kg | Agua {} L | Residuos {} kg | Puntuación {}/100",
        estimate.co2_kg, estimate.water_l, estimate.waste_kg, estimate.score
    );
}

fn print_summary_report(
    user_name: &str,
    device: &DeviceProfile,
    class_name: &str,
    usage: UsagePeriod,
    end_of_life: EndOfLifeAction,
    estimate: &ImpactEstimate,
) {
    println!("\n\n--- [Final Summary Report] ---");
    println!("========================================");
    println!("Usuario: {}", user_name);
    println!(
        "Dispositivo: {} ({}, {})",
        device.model,
        device.kind.display_label(),
        device.device_id
    );
    match device.year {
        Some(year) => println!("Año de fabricación: {}", year),
        None => println!("Año de fabricación: desconocido"),
    }
    println!("Clase de referencia: {}", class_name);
    println!("----------------------------------------");
    println!("Decisiones:");
    println!("  - Tiempo de uso: {}", usage.label());
    println!("  - Fin de vida:   {}", end_of_life.label());
    println!("\nImpacto ambiental estimado:");
    println!("  - CO₂:      {:>8} kg", estimate.co2_kg);
    println!("  - Agua:     {:>8} L", estimate.water_l);
    println!("  - Residuos: {:>8} kg", estimate.waste_kg);
    println!("  - Puntuación ecológica: {}/100", estimate.score);
    println!("  - {}", recommend::score_band(estimate.score));
    println!("\nRecomendaciones:");
    for line in recommend::end_of_life_recommendations(end_of_life) {
        println!("  - {}", line);
    }
    println!("========================================");
}

fn prepare_output_dir(
    store: &DataStore,
    label: &str,
    explicit: Option<String>,
) -> Result<String> {
    let dir = match explicit {
        Some(dir) => dir,
        None => {
            let slug: String = label
                .chars()
                .map(|c| if c.is_alphanumeric() { c } else { '_' })
                .collect();
            format!(
                "{}/{}_{}",
                store.runs_dir().display(),
                slug,
                chrono::Utc::now().format("%Y%m%d_%H%M%S")
            )
        }
    };
    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create output directory: {}", dir))?;
    Ok(dir)
}
