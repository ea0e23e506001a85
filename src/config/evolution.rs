use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::{GepError, Result};
use serde::{Deserialize, Serialize};

/// Operator rates and selection pressure for a population.
///
/// Rates are per-organism probabilities, except `mutation_rate`, which is per
/// locus and defaults to two expected mutations per organism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub exclusion_level: f64,
    pub mutation_rate: Option<f64>,
    pub inversion_rate: f64,
    pub is_transposition_rate: f64,
    pub is_transposition_lengths: Vec<usize>,
    pub ris_transposition_rate: f64,
    pub ris_transposition_lengths: Vec<usize>,
    pub gene_transposition_rate: f64,
    pub crossover_one_point_rate: f64,
    pub crossover_two_point_rate: f64,
    pub crossover_gene_rate: f64,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            exclusion_level: 1.5,
            mutation_rate: None,
            inversion_rate: 0.1,
            is_transposition_rate: 0.1,
            is_transposition_lengths: vec![1, 2, 3],
            ris_transposition_rate: 0.1,
            ris_transposition_lengths: vec![1, 2, 3],
            gene_transposition_rate: 0.1,
            crossover_one_point_rate: 0.3,
            crossover_two_point_rate: 0.3,
            crossover_gene_rate: 0.1,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Per-locus mutation probability for organisms of `genome_length` alleles
    pub fn mutation_rate_for(&self, genome_length: usize) -> f64 {
        self.mutation_rate
            .unwrap_or_else(|| 2.0 / genome_length.max(1) as f64)
    }

    fn rates(&self) -> [(&'static str, f64); 8] {
        [
            ("inversion_rate", self.inversion_rate),
            ("is_transposition_rate", self.is_transposition_rate),
            ("ris_transposition_rate", self.ris_transposition_rate),
            ("gene_transposition_rate", self.gene_transposition_rate),
            ("crossover_one_point_rate", self.crossover_one_point_rate),
            ("crossover_two_point_rate", self.crossover_two_point_rate),
            ("crossover_gene_rate", self.crossover_gene_rate),
            ("mutation_rate", self.mutation_rate.unwrap_or(0.0)),
        ]
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<()> {
        if self.exclusion_level.is_nan() || self.exclusion_level <= 0.0 {
            return Err(GepError::Configuration(
                "Exclusion level must be positive".to_string(),
            ));
        }
        for (name, rate) in self.rates() {
            if !(0.0..=1.0).contains(&rate) {
                return Err(GepError::Configuration(format!(
                    "{} must be between 0 and 1, got {}",
                    name, rate
                )));
            }
        }
        for (name, lengths) in [
            ("is_transposition_lengths", &self.is_transposition_lengths),
            ("ris_transposition_lengths", &self.ris_transposition_lengths),
        ] {
            if lengths.is_empty() || lengths.contains(&0) {
                return Err(GepError::Configuration(format!(
                    "{} must hold at least one positive length",
                    name
                )));
            }
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: Self::section_name().to_string(),
            fields: vec![
                FieldManifest {
                    name: "exclusion_level".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(1.5),
                    min: Some(0.0),
                    max: None,
                    description: "Selection pressure of the sigma-scaled roulette".to_string(),
                },
                FieldManifest::rate(
                    "mutation_rate",
                    serde_json::Value::Null,
                    "Per-locus mutation probability, 2 / genome length when unset",
                ),
                FieldManifest::rate("inversion_rate", serde_json::json!(0.1), "Head inversion"),
                FieldManifest::rate(
                    "is_transposition_rate",
                    serde_json::json!(0.1),
                    "Insertion sequence transposition",
                ),
                FieldManifest {
                    name: "is_transposition_lengths".to_string(),
                    field_type: "integer_list".to_string(),
                    default: serde_json::json!([1, 2, 3]),
                    min: Some(1.0),
                    max: None,
                    description: "Candidate IS element lengths".to_string(),
                },
                FieldManifest::rate(
                    "ris_transposition_rate",
                    serde_json::json!(0.1),
                    "Root insertion sequence transposition",
                ),
                FieldManifest {
                    name: "ris_transposition_lengths".to_string(),
                    field_type: "integer_list".to_string(),
                    default: serde_json::json!([1, 2, 3]),
                    min: Some(1.0),
                    max: None,
                    description: "Candidate RIS element lengths".to_string(),
                },
                FieldManifest::rate(
                    "gene_transposition_rate",
                    serde_json::json!(0.1),
                    "Gene transposition",
                ),
                FieldManifest::rate(
                    "crossover_one_point_rate",
                    serde_json::json!(0.3),
                    "One-point recombination",
                ),
                FieldManifest::rate(
                    "crossover_two_point_rate",
                    serde_json::json!(0.3),
                    "Two-point recombination",
                ),
                FieldManifest::rate(
                    "crossover_gene_rate",
                    serde_json::json!(0.1),
                    "Gene recombination",
                ),
                FieldManifest {
                    name: "seed".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::Value::Null,
                    min: None,
                    max: None,
                    description: "Random seed, entropy when unset".to_string(),
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let config = EvolutionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mutation_rate_for(20), 0.1);
    }

    #[test]
    fn test_explicit_mutation_rate() {
        let config = EvolutionConfig {
            mutation_rate: Some(0.5),
            ..Default::default()
        };
        assert_eq!(config.mutation_rate_for(20), 0.5);
    }

    #[test]
    fn test_rejects_bad_rates() {
        let config = EvolutionConfig {
            crossover_gene_rate: 1.5,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(GepError::Configuration(_))));

        let config = EvolutionConfig {
            mutation_rate: Some(-0.1),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EvolutionConfig {
            exclusion_level: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_lengths() {
        let config = EvolutionConfig {
            is_transposition_lengths: vec![],
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = EvolutionConfig {
            ris_transposition_lengths: vec![2, 0],
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_manifest_covers_fields() {
        let manifest = EvolutionConfig::default().to_manifest();
        assert_eq!(manifest.section, EvolutionConfig::section_name());
        assert_eq!(manifest.fields.len(), 12);
        assert!(manifest.fields.iter().any(|f| f.name == "seed"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EvolutionConfig = toml::from_str("inversion_rate = 0.2\nseed = 7").unwrap();
        assert_eq!(config.inversion_rate, 0.2);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.exclusion_level, 1.5);
    }
}
