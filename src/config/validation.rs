use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(budget) = config.budget {
        if !budget.is_finite() || budget < 0.0 {
            errors.push("budget: must be a non-negative number".to_string());
        }
    }

    if let Some(price) = config.default_price {
        if !price.is_finite() || price < 0.0 {
            errors.push("default_price: must be a non-negative number".to_string());
        }
    }

    // Sorted so the error list is stable across runs
    let mut names: Vec<&String> = config.prices.keys().collect();
    names.sort();
    for name in names {
        let price = config.prices[name];
        if !price.is_finite() || price < 0.0 {
            errors.push(format!(
                "prices.{}: must be a non-negative number, got {}",
                name, price
            ));
        }
    }

    if config.max_alternatives == Some(0) {
        errors.push("max_alternatives: must be at least 1".to_string());
    }

    for (i, name) in config.default_criteria.iter().enumerate() {
        if name.trim().is_empty() {
            errors.push(format!("default_criteria[{}]: name must not be empty", i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
