use simuvida_schemas::decision::EndOfLifeAction;

/// Static guidance shown next to the final results, keyed by the chosen
/// end-of-life action.
pub fn end_of_life_recommendations(action: EndOfLifeAction) -> &'static [&'static str] {
    match action {
        EndOfLifeAction::Discard => &[
            "Considera donar tu dispositivo. ¡Puede seguir siendo útil!",
            "Busca puntos de reciclaje autorizados en tu ciudad.",
            "Retira la batería antes de desechar. Es un residuo peligroso.",
        ],
        EndOfLifeAction::Donate => &[
            "Donar alarga la vida útil del dispositivo y evita nuevos residuos.",
            "Borra tus datos personales antes de entregarlo.",
            "Incluye el cargador y los accesorios originales.",
        ],
        EndOfLifeAction::Repair => &[
            "Reparar extiende la vida útil y reduce la demanda de nuevos recursos.",
            "Busca técnicos certificados para una reparación segura.",
            "Cada reparación evita ~50 kg de residuos electrónicos.",
        ],
        EndOfLifeAction::Recycle => &[
            "¡Excelente decisión! El reciclaje reduce hasta el 80% de emisiones.",
            "Guarda tus datos en la nube antes de entregar el dispositivo.",
            "Comparte esta acción en redes para inspirar a otros.",
        ],
    }
}

/// Qualitative band for a 20–100 eco-score.
pub fn score_band(score: u32) -> &'static str {
    match score {
        85..=100 => "Impacto muy bajo: decisiones ejemplares",
        65..=84 => "Impacto bajo: mejor que el promedio de dispositivos similares",
        45..=64 => "Impacto moderado: hay margen de mejora",
        _ => "Impacto alto: reconsidera tus decisiones de uso y descarte",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_action_has_three_recommendations() {
        for action in EndOfLifeAction::ALL {
            assert_eq!(end_of_life_recommendations(action).len(), 3);
        }
    }

    #[test]
    fn score_bands_cover_the_valid_range() {
        assert!(score_band(20).starts_with("Impacto alto"));
        assert!(score_band(44).starts_with("Impacto alto"));
        assert!(score_band(45).starts_with("Impacto moderado"));
        assert!(score_band(64).starts_with("Impacto moderado"));
        assert!(score_band(65).starts_with("Impacto bajo"));
        assert!(score_band(84).starts_with("Impacto bajo"));
        assert!(score_band(85).starts_with("Impacto muy bajo"));
        assert!(score_band(100).starts_with("Impacto muy bajo"));
    }
}
