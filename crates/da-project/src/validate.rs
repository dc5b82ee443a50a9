//! Structural validation of a machine description.
//!
//! Everything that can be decided from the description alone is checked
//! here; expressions and topology are checked when compiling.

use std::collections::{HashMap, HashSet};

use da_graph::Orientation;

use crate::schema::{ComponentDef, ComponentKind, Config, ShaftKey};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Orientation of every shaft, keyed by id.
pub fn shaft_orientations(config: &Config) -> Result<HashMap<ShaftKey, Orientation>, ValidationError> {
    let mut orientations = HashMap::new();
    for shaft in &config.shafts {
        let (width, height) = shaft.extent().ok_or_else(|| ValidationError::InvalidValue {
            field: format!("shaft {} span", shaft.id),
            value: format!("{:?} to {:?}", shaft.start, shaft.end),
            reason: "span is too large".to_string(),
        })?;
        if width < 1 || height < 1 {
            return Err(ValidationError::InvalidValue {
                field: format!("shaft {} end", shaft.id),
                value: format!("{:?}", shaft.end),
                reason: format!("ends before its start {:?}", shaft.start),
            });
        }
        let orientation =
            Orientation::from_extent(width, height).ok_or_else(|| ValidationError::InvalidValue {
                field: format!("shaft {} span", shaft.id),
                value: format!("{width}x{height}"),
                reason: "shafts must be straight".to_string(),
            })?;
        if orientations.insert(shaft.id, orientation).is_some() {
            return Err(ValidationError::DuplicateId {
                id: shaft.id.to_string(),
                context: "shafts".to_string(),
            });
        }
    }
    Ok(orientations)
}

pub fn validate_config(config: &Config) -> Result<(), ValidationError> {
    let orientations = shaft_orientations(config)?;

    let mut component_ids = HashSet::new();
    let mut motors = 0;
    for component in &config.components {
        if let Some(id) = component.comp_id {
            if !component_ids.insert(id) {
                return Err(ValidationError::DuplicateId {
                    id: id.to_string(),
                    context: "components".to_string(),
                });
            }
        }
        if matches!(component.kind, ComponentKind::Motor { .. }) {
            motors += 1;
        }
        validate_component(component, &orientations)?;
    }

    if motors != 1 {
        return Err(ValidationError::InvalidValue {
            field: "motor count".to_string(),
            value: motors.to_string(),
            reason: "a machine needs exactly one motor".to_string(),
        });
    }
    Ok(())
}

fn validate_component(
    component: &ComponentDef,
    orientations: &HashMap<ShaftKey, Orientation>,
) -> Result<(), ValidationError> {
    let label = component.label();
    for (field, key) in component.kind.shaft_refs() {
        if !orientations.contains_key(&key) {
            return Err(ValidationError::MissingReference {
                id: key.to_string(),
                context: format!("{label} {field}"),
            });
        }
    }

    let finite = |field: &str, value: f64| {
        if value.is_finite() {
            Ok(())
        } else {
            Err(ValidationError::InvalidValue {
                field: format!("{label} {field}"),
                value: value.to_string(),
                reason: "must be finite".to_string(),
            })
        }
    };
    let oriented = |field: &str, key: ShaftKey, wanted: Orientation| match orientations.get(&key) {
        Some(o) if !o.fits(wanted) => Err(ValidationError::InvalidValue {
            field: format!("{label} {field}"),
            value: key.to_string(),
            reason: format!("shaft is {o:?}, expected {wanted:?}"),
        }),
        _ => Ok(()),
    };

    match &component.kind {
        ComponentKind::Integrator {
            initial_position, ..
        } => finite("initialPosition", *initial_position)?,
        ComponentKind::Differential {
            diff_shaft1,
            sum_shaft,
            diff_shaft2,
        } => {
            let present = [diff_shaft1, sum_shaft, diff_shaft2]
                .iter()
                .filter(|s| s.is_some())
                .count();
            if present < 2 {
                return Err(ValidationError::InvalidValue {
                    field: format!("{label} shafts"),
                    value: present.to_string(),
                    reason: "a differential needs at least two connected shafts".to_string(),
                });
            }
        }
        ComponentKind::Multiplier { factor, .. } => {
            if let crate::schema::ParamDef::Number(v) = factor {
                finite("factor", *v)?;
            }
        }
        ComponentKind::FunctionTable { function, .. } => {
            if function.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: format!("{label} fn"),
                    value: String::new(),
                    reason: "function expression is empty".to_string(),
                });
            }
        }
        ComponentKind::Motor { rotation, .. } => {
            if let Some(r) = rotation {
                finite("rotation", *r)?;
            }
        }
        ComponentKind::OutputTable {
            output_shaft1,
            output_shaft2,
            initial_y1,
            initial_y2,
            ..
        } => {
            if output_shaft1.is_none() && output_shaft2.is_none() {
                return Err(ValidationError::MissingReference {
                    id: "outputShaft1".to_string(),
                    context: format!("{label} needs at least one output shaft"),
                });
            }
            finite("initialY1", *initial_y1)?;
            finite("initialY2", *initial_y2)?;
        }
        ComponentKind::CrossConnect {
            horizontal,
            vertical,
            ..
        }
        | ComponentKind::Gear {
            horizontal,
            vertical,
        } => {
            oriented("horizontal", *horizontal, Orientation::Horizontal)?;
            oriented("vertical", *vertical, Orientation::Vertical)?;
        }
        ComponentKind::GearPair {
            input_ratio,
            output_ratio,
            ..
        } => {
            for (field, ratio) in [("inputRatio", input_ratio), ("outputRatio", output_ratio)] {
                finite(field, *ratio)?;
                if *ratio == 0.0 {
                    return Err(ValidationError::InvalidValue {
                        field: format!("{label} {field}"),
                        value: ratio.to_string(),
                        reason: "gear ratios must be nonzero".to_string(),
                    });
                }
            }
        }
        ComponentKind::Dial { .. } | ComponentKind::Label { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ComponentDef, ParamDef, ShaftDef};

    fn shaft(id: ShaftKey, start: [i64; 2], end: [i64; 2]) -> ShaftDef {
        ShaftDef { id, start, end }
    }

    fn motor_on(key: ShaftKey) -> ComponentDef {
        ComponentDef::new(ComponentKind::Motor {
            output_shaft: key,
            reversed: false,
            rotation: None,
        })
    }

    fn config(components: Vec<ComponentDef>) -> Config {
        Config {
            shafts: vec![
                shaft(0, [0, 0], [5, 0]),
                shaft(1, [2, 0], [2, 6]),
                shaft(2, [4, 4], [4, 4]),
            ],
            components,
            ..Config::default()
        }
    }

    #[test]
    fn accepts_minimal_machine() {
        validate_config(&config(vec![motor_on(0)])).unwrap();
    }

    #[test]
    fn rejects_bent_and_reversed_shafts() {
        let mut c = config(vec![motor_on(0)]);
        c.shafts.push(shaft(9, [0, 0], [3, 3]));
        assert!(matches!(
            validate_config(&c),
            Err(ValidationError::InvalidValue { reason, .. }) if reason.contains("straight")
        ));

        let mut c = config(vec![motor_on(0)]);
        c.shafts.push(shaft(9, [3, 0], [1, 0]));
        assert!(validate_config(&c).is_err());

        let mut c = config(vec![motor_on(0)]);
        c.shafts.push(shaft(9, [i64::MIN, 0], [i64::MAX, 0]));
        assert!(matches!(
            validate_config(&c),
            Err(ValidationError::InvalidValue { reason, .. }) if reason.contains("too large")
        ));
        if let Some(last) = c.shafts.last_mut() {
            *last = shaft(9, [0, -1], [0, i64::MAX]);
        }
        assert!(validate_config(&c).is_err());
    }

    #[test]
    fn rejects_duplicate_shaft_id() {
        let mut c = config(vec![motor_on(0)]);
        c.shafts.push(shaft(1, [7, 7], [8, 7]));
        assert!(matches!(
            validate_config(&c),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn rejects_dangling_reference() {
        let c = config(vec![motor_on(42)]);
        let err = validate_config(&c).unwrap_err();
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn motor_count_must_be_one() {
        assert!(validate_config(&config(vec![])).is_err());
        assert!(validate_config(&config(vec![motor_on(0), motor_on(1)])).is_err());
    }

    #[test]
    fn differential_needs_two_shafts() {
        let one = ComponentDef::new(ComponentKind::Differential {
            diff_shaft1: Some(0),
            sum_shaft: None,
            diff_shaft2: None,
        });
        assert!(validate_config(&config(vec![motor_on(0), one])).is_err());

        let two = ComponentDef::new(ComponentKind::Differential {
            diff_shaft1: Some(0),
            sum_shaft: Some(1),
            diff_shaft2: None,
        });
        validate_config(&config(vec![motor_on(0), two])).unwrap();
    }

    #[test]
    fn cross_connect_checks_orientation() {
        let swapped = ComponentDef::new(ComponentKind::CrossConnect {
            horizontal: 1,
            vertical: 0,
            reversed: false,
        })
        .with_id(3);
        let err = validate_config(&config(vec![motor_on(0), swapped])).unwrap_err();
        assert!(err.to_string().contains("crossConnect #3"));

        // a single-cell shaft fits either slot
        let point = ComponentDef::new(ComponentKind::Gear {
            horizontal: 2,
            vertical: 1,
        });
        validate_config(&config(vec![motor_on(0), point])).unwrap();
    }

    #[test]
    fn numeric_parameters_must_be_usable() {
        let zero_ratio = ComponentDef::new(ComponentKind::GearPair {
            shaft1: 0,
            shaft2: 1,
            input_ratio: 0.0,
            output_ratio: 2.0,
        });
        assert!(validate_config(&config(vec![motor_on(0), zero_ratio])).is_err());

        let nan_factor = ComponentDef::new(ComponentKind::Multiplier {
            input_shaft: 0,
            output_shaft: 1,
            factor: ParamDef::Number(f64::NAN),
        });
        assert!(validate_config(&config(vec![motor_on(0), nan_factor])).is_err());
    }

    #[test]
    fn output_table_needs_a_y_shaft() {
        let table = ComponentDef::new(ComponentKind::OutputTable {
            input_shaft: 0,
            output_shaft1: None,
            output_shaft2: None,
            initial_y1: 0.0,
            initial_y2: 0.0,
        });
        assert!(matches!(
            validate_config(&config(vec![motor_on(0), table])),
            Err(ValidationError::MissingReference { .. })
        ));
    }

    #[test]
    fn duplicate_component_ids_rejected() {
        let label = ComponentDef::new(ComponentKind::Label { text: None }).with_id(1);
        let c = config(vec![motor_on(0).with_id(1), label]);
        assert!(matches!(
            validate_config(&c),
            Err(ValidationError::DuplicateId { .. })
        ));
    }
}
