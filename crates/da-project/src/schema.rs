//! Machine description schema.

use serde::{Deserialize, Serialize};

/// Shafts are referenced by the numeric id they carry in the description.
pub type ShaftKey = i64;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub shafts: Vec<ShaftDef>,
    #[serde(default)]
    pub components: Vec<ComponentDef>,
    #[serde(default, skip_serializing_if = "Settings::is_empty")]
    pub settings: Settings,
}

/// A straight run of grid cells from `start` to `end`, inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShaftDef {
    pub id: ShaftKey,
    pub start: [i64; 2],
    pub end: [i64; 2],
}

impl ShaftDef {
    /// `(width, height)` in cells, or `None` when the span does not fit in
    /// an `i64`.
    pub fn extent(&self) -> Option<(i64, i64)> {
        let cells = |axis: usize| self.end[axis].checked_sub(self.start[axis])?.checked_add(1);
        Some((cells(0)?, cells(1)?))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// `name = expr` statements separated by `;` or newlines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_variables: Option<String>,
}

impl Settings {
    pub fn is_empty(&self) -> bool {
        self.custom_variables.is_none()
    }
}

/// A placed component. `compID` and `position` are layout data and do not
/// affect the machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentDef {
    #[serde(rename = "compID", default, skip_serializing_if = "Option::is_none")]
    pub comp_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 2]>,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

impl ComponentDef {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            comp_id: None,
            position: None,
            kind,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.comp_id = Some(id);
        self
    }

    /// Human readable label for messages, e.g. `integrator #3`.
    pub fn label(&self) -> String {
        match self.comp_id {
            Some(id) => format!("{} #{id}", self.kind.type_name()),
            None => self.kind.type_name().to_string(),
        }
    }
}

/// A numeric parameter written either as a number or as an expression over
/// the custom variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParamDef {
    Number(f64),
    Expr(String),
}

impl Default for ParamDef {
    fn default() -> Self {
        ParamDef::Number(1.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ComponentKind {
    Integrator {
        #[serde(rename = "variableOfIntegrationShaft")]
        variable_shaft: ShaftKey,
        #[serde(rename = "integrandShaft")]
        integrand_shaft: ShaftKey,
        #[serde(rename = "outputShaft")]
        output_shaft: ShaftKey,
        #[serde(default)]
        reversed: bool,
        #[serde(rename = "initialPosition", default)]
        initial_position: f64,
    },
    Differential {
        #[serde(rename = "diffShaft1", default, skip_serializing_if = "Option::is_none")]
        diff_shaft1: Option<ShaftKey>,
        #[serde(rename = "sumShaft", default, skip_serializing_if = "Option::is_none")]
        sum_shaft: Option<ShaftKey>,
        #[serde(rename = "diffShaft2", default, skip_serializing_if = "Option::is_none")]
        diff_shaft2: Option<ShaftKey>,
    },
    Multiplier {
        #[serde(rename = "inputShaft")]
        input_shaft: ShaftKey,
        #[serde(rename = "outputShaft")]
        output_shaft: ShaftKey,
        #[serde(default)]
        factor: ParamDef,
    },
    FunctionTable {
        #[serde(rename = "inputShaft")]
        input_shaft: ShaftKey,
        #[serde(rename = "outputShaft")]
        output_shaft: ShaftKey,
        /// Expression in `x`.
        #[serde(rename = "fn")]
        function: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x_min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x_max: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y_min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y_max: Option<f64>,
    },
    Motor {
        #[serde(rename = "outputShaft")]
        output_shaft: ShaftKey,
        #[serde(default)]
        reversed: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rotation: Option<f64>,
    },
    OutputTable {
        #[serde(rename = "inputShaft")]
        input_shaft: ShaftKey,
        #[serde(rename = "outputShaft1", default, skip_serializing_if = "Option::is_none")]
        output_shaft1: Option<ShaftKey>,
        #[serde(rename = "outputShaft2", default, skip_serializing_if = "Option::is_none")]
        output_shaft2: Option<ShaftKey>,
        #[serde(rename = "initialY1", default)]
        initial_y1: f64,
        #[serde(rename = "initialY2", default)]
        initial_y2: f64,
    },
    CrossConnect {
        horizontal: ShaftKey,
        vertical: ShaftKey,
        #[serde(default)]
        reversed: bool,
    },
    GearPair {
        shaft1: ShaftKey,
        shaft2: ShaftKey,
        #[serde(rename = "inputRatio")]
        input_ratio: f64,
        #[serde(rename = "outputRatio")]
        output_ratio: f64,
    },
    Gear {
        horizontal: ShaftKey,
        vertical: ShaftKey,
    },
    Dial {
        #[serde(rename = "inputShaft")]
        input_shaft: ShaftKey,
    },
    Label {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl ComponentKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ComponentKind::Integrator { .. } => "integrator",
            ComponentKind::Differential { .. } => "differential",
            ComponentKind::Multiplier { .. } => "multiplier",
            ComponentKind::FunctionTable { .. } => "functionTable",
            ComponentKind::Motor { .. } => "motor",
            ComponentKind::OutputTable { .. } => "outputTable",
            ComponentKind::CrossConnect { .. } => "crossConnect",
            ComponentKind::GearPair { .. } => "gearPair",
            ComponentKind::Gear { .. } => "gear",
            ComponentKind::Dial { .. } => "dial",
            ComponentKind::Label { .. } => "label",
        }
    }

    /// Every shaft key the component names, with the field it came from.
    pub fn shaft_refs(&self) -> Vec<(&'static str, ShaftKey)> {
        let mut refs = Vec::new();
        let mut push = |field, key: Option<ShaftKey>| {
            if let Some(key) = key {
                refs.push((field, key));
            }
        };
        match self {
            ComponentKind::Integrator {
                variable_shaft,
                integrand_shaft,
                output_shaft,
                ..
            } => {
                push("variableOfIntegrationShaft", Some(*variable_shaft));
                push("integrandShaft", Some(*integrand_shaft));
                push("outputShaft", Some(*output_shaft));
            }
            ComponentKind::Differential {
                diff_shaft1,
                sum_shaft,
                diff_shaft2,
            } => {
                push("diffShaft1", *diff_shaft1);
                push("sumShaft", *sum_shaft);
                push("diffShaft2", *diff_shaft2);
            }
            ComponentKind::Multiplier {
                input_shaft,
                output_shaft,
                ..
            }
            | ComponentKind::FunctionTable {
                input_shaft,
                output_shaft,
                ..
            } => {
                push("inputShaft", Some(*input_shaft));
                push("outputShaft", Some(*output_shaft));
            }
            ComponentKind::Motor { output_shaft, .. } => push("outputShaft", Some(*output_shaft)),
            ComponentKind::OutputTable {
                input_shaft,
                output_shaft1,
                output_shaft2,
                ..
            } => {
                push("inputShaft", Some(*input_shaft));
                push("outputShaft1", *output_shaft1);
                push("outputShaft2", *output_shaft2);
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
                push("horizontal", Some(*horizontal));
                push("vertical", Some(*vertical));
            }
            ComponentKind::GearPair { shaft1, shaft2, .. } => {
                push("shaft1", Some(*shaft1));
                push("shaft2", Some(*shaft2));
            }
            ComponentKind::Dial { input_shaft } => push("inputShaft", Some(*input_shaft)),
            ComponentKind::Label { .. } => {}
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_flat_component_objects() {
        let json = r#"{
            "type": "integrator",
            "compID": 4,
            "position": [3, 7],
            "variableOfIntegrationShaft": 0,
            "integrandShaft": 1,
            "outputShaft": 2,
            "initialPosition": -1
        }"#;
        let c: ComponentDef = serde_json::from_str(json).unwrap();
        assert_eq!(c.comp_id, Some(4));
        assert_eq!(c.position, Some([3.0, 7.0]));
        assert_eq!(c.label(), "integrator #4");
        match c.kind {
            ComponentKind::Integrator {
                initial_position,
                reversed,
                ..
            } => {
                assert_eq!(initial_position, -1.0);
                assert!(!reversed);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn factor_accepts_number_or_expression() {
        let a: ComponentDef = serde_json::from_str(
            r#"{"type":"multiplier","inputShaft":0,"outputShaft":1,"factor":2.5}"#,
        )
        .unwrap();
        let b: ComponentDef = serde_json::from_str(
            r#"{"type":"multiplier","inputShaft":0,"outputShaft":1,"factor":"k / 2"}"#,
        )
        .unwrap();
        assert!(matches!(
            a.kind,
            ComponentKind::Multiplier { factor: ParamDef::Number(v), .. } if v == 2.5
        ));
        assert!(matches!(
            b.kind,
            ComponentKind::Multiplier { factor: ParamDef::Expr(ref s), .. } if s == "k / 2"
        ));
    }

    #[test]
    fn shaft_extent_is_inclusive() {
        let s = ShaftDef {
            id: 0,
            start: [2, 5],
            end: [6, 5],
        };
        assert_eq!(s.extent(), Some((5, 1)));

        let wide = ShaftDef {
            id: 1,
            start: [i64::MIN, 0],
            end: [i64::MAX, 0],
        };
        assert_eq!(wide.extent(), None);
    }

    #[test]
    fn differential_refs_skip_missing_slots() {
        let kind = ComponentKind::Differential {
            diff_shaft1: Some(1),
            sum_shaft: None,
            diff_shaft2: Some(3),
        };
        assert_eq!(kind.shaft_refs(), vec![("diffShaft1", 1), ("diffShaft2", 3)]);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let err = serde_json::from_str::<ComponentDef>(r#"{"type":"flywheel"}"#);
        assert!(err.is_err());
    }
}
