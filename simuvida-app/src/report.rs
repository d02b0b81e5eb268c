use simuvida_core::recommend;
use simuvida_schemas::{
    decision::{EndOfLifeAction, UsagePeriod},
    device::DeviceProfile,
    impact::ImpactEstimate,
};

/// Builds the Markdown certificate for a completed walkthrough.
pub fn certificate_markdown(
    user_name: &str,
    device: &DeviceProfile,
    class_name: &str,
    usage: UsagePeriod,
    end_of_life: EndOfLifeAction,
    estimate: &ImpactEstimate,
    issued_on: &str,
) -> String {
    let mut doc = String::new();
    doc.push_str("# Certificado de simulación ambiental\n\n");
    doc.push_str(&format!(
        "Emitido para **{}** el {}.\n\n",
        user_name, issued_on
    ));

    doc.push_str("## Dispositivo\n\n");
    doc.push_str("| Campo | Valor |\n|-------|-------|\n");
    doc.push_str(&format!("| Identificador | {} |\n", device.device_id));
    doc.push_str(&format!("| Tipo | {} |\n", device.kind.display_label()));
    doc.push_str(&format!("| Modelo | {} |\n", device.model));
    match device.year {
        Some(year) => doc.push_str(&format!("| Año de fabricación | {} |\n", year)),
        None => doc.push_str("| Año de fabricación | desconocido |\n"),
    }
    if let Some(materials) = &device.materials {
        doc.push_str(&format!("| Materiales | {} |\n", materials));
    }
    doc.push_str(&format!("| Clase de referencia | {} |\n\n", class_name));

    doc.push_str("## Decisiones\n\n");
    doc.push_str(&format!("- Etapa de uso: {}\n", usage.label()));
    doc.push_str(&format!("- Fin de vida: {}\n\n", end_of_life.label()));

    doc.push_str("## Impacto estimado\n\n");
    doc.push_str("| Indicador | Valor |\n|-----------|-------|\n");
    doc.push_str(&format!("| CO₂ | {} kg |\n", estimate.co2_kg));
    doc.push_str(&format!("| Agua | {} L |\n", estimate.water_l));
    doc.push_str(&format!("| Residuos | {} kg |\n", estimate.waste_kg));
    doc.push_str(&format!(
        "| Puntuación ecológica | {}/100 |\n\n",
        estimate.score
    ));
    doc.push_str(&format!("{}.\n\n", recommend::score_band(estimate.score)));

    doc.push_str("## Recomendaciones\n\n");
    for line in recommend::end_of_life_recommendations(end_of_life) {
        doc.push_str(&format!("- {}\n", line));
    }
    doc.push_str("\n---\n\nSimuVida — Educar para proteger nuestro planeta.\n");
    doc
}
