//! Turning a validated description into a runnable [`Simulator`].

use da_core::Real;
use da_expr::{compile as compile_expr, Bindings, ExprError};
use da_graph::{Orientation, ShaftIndex};
use da_sim::{
    Device, Dial, FunctionTable, Integrator, OutputTable, Simulator, SimulatorBuilder, TransferFn,
};
use tracing::{debug, info, warn};

use crate::schema::{ComponentDef, ComponentKind, Config, ParamDef, ShaftKey};
use crate::validate::{shaft_orientations, validate_config};
use crate::variables::resolve_custom_variables;
use crate::{ProjectError, ProjectResult};

/// Motor rotation per tick when neither the description nor the caller set one.
pub const DEFAULT_MOTOR_ROTATION: Real = 1.0;

#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Overrides the motor's own `rotation`.
    pub motor_rotation: Option<Real>,
}

/// Validate `config`, resolve its custom variables and build the machine.
pub fn compile(config: &Config, options: &CompileOptions) -> ProjectResult<Simulator> {
    validate_config(config)?;
    let variables = resolve_custom_variables(&config.settings)?.to_bindings();

    let mut machine = MachineBuilder {
        builder: SimulatorBuilder::new(),
        index: ShaftIndex::new(),
        variables,
    };

    let orientations = shaft_orientations(config)?;
    for shaft in &config.shafts {
        let orientation = orientations.get(&shaft.id).copied().unwrap_or(Orientation::Point);
        let id = machine
            .builder
            .add_shaft(format!("shaft {}", shaft.id), orientation);
        machine.index.insert(shaft.id, id)?;
    }

    for component in &config.components {
        machine.add_component(component, options)?;
    }

    let simulator = machine.builder.build()?;
    info!(
        shafts = simulator.shafts().len(),
        devices = simulator.devices().len(),
        "machine compiled"
    );
    Ok(simulator)
}

struct MachineBuilder {
    builder: SimulatorBuilder,
    index: ShaftIndex,
    variables: Bindings,
}

impl MachineBuilder {
    fn shaft(&self, key: ShaftKey) -> ProjectResult<da_core::ShaftId> {
        Ok(self.index.get(key)?)
    }

    /// A shaft for a slot the description leaves open.
    fn floating_shaft(&mut self, owner: &str) -> da_core::ShaftId {
        let id = self
            .builder
            .add_shaft(format!("{owner} (floating)"), Orientation::Point);
        self.index.insert_anonymous(id);
        id
    }

    fn param(&self, component: &ComponentDef, param: &ParamDef) -> ProjectResult<Real> {
        match param {
            ParamDef::Number(v) => Ok(*v),
            ParamDef::Expr(src) => {
                let compiled = compile_expr(src, &self.variables)
                    .map_err(|source| expression_error(component, source))?;
                compiled.constant().ok_or_else(|| {
                    expression_error(
                        component,
                        ExprError::UndefinedVariables {
                            names: compiled.free_variables().into_iter().collect(),
                        },
                    )
                })
            }
        }
    }

    fn transfer_fn(&self, component: &ComponentDef, src: &str) -> ProjectResult<TransferFn> {
        let compiled = compile_expr(src, &self.variables)
            .map_err(|source| expression_error(component, source))?;
        let unknown: Vec<String> = compiled
            .free_variables()
            .into_iter()
            .filter(|name| name != da_sim::transfer::TABLE_VARIABLE)
            .collect();
        if !unknown.is_empty() {
            return Err(expression_error(
                component,
                ExprError::UndefinedVariables { names: unknown },
            ));
        }
        Ok(TransferFn::from_compiled(compiled))
    }

    fn add_component(
        &mut self,
        component: &ComponentDef,
        options: &CompileOptions,
    ) -> ProjectResult<()> {
        let label = component.label();
        let device: Device = match &component.kind {
            ComponentKind::Integrator {
                variable_shaft,
                integrand_shaft,
                output_shaft,
                reversed,
                initial_position,
            } => Integrator::new(
                self.shaft(*variable_shaft)?,
                self.shaft(*integrand_shaft)?,
                self.shaft(*output_shaft)?,
            )
            .with_initial_position(*initial_position)
            .reversed(*reversed)
            .into(),
            ComponentKind::Differential {
                diff_shaft1,
                sum_shaft,
                diff_shaft2,
            } => {
                let mut slots = [da_core::ShaftId::from_index(0); 3];
                for (slot, key) in slots.iter_mut().zip([diff_shaft1, sum_shaft, diff_shaft2]) {
                    *slot = match key {
                        Some(key) => self.shaft(*key)?,
                        None => {
                            debug!(component = %label, "allocating floating differential shaft");
                            self.floating_shaft(&label)
                        }
                    };
                }
                Device::differential(slots[0], slots[1], slots[2])
            }
            ComponentKind::Multiplier {
                input_shaft,
                output_shaft,
                factor,
            } => Device::multiplier(
                self.shaft(*input_shaft)?,
                self.shaft(*output_shaft)?,
                self.param(component, factor)?,
            ),
            ComponentKind::FunctionTable {
                input_shaft,
                output_shaft,
                function,
                ..
            } => FunctionTable::new(
                self.shaft(*input_shaft)?,
                self.shaft(*output_shaft)?,
                self.transfer_fn(component, function)?,
            )
            .into(),
            ComponentKind::Motor {
                output_shaft,
                reversed,
                rotation,
            } => Device::Motor {
                shaft: self.shaft(*output_shaft)?,
                rotation: options
                    .motor_rotation
                    .or(*rotation)
                    .unwrap_or(DEFAULT_MOTOR_ROTATION),
                reversed: *reversed,
            },
            ComponentKind::OutputTable {
                input_shaft,
                output_shaft1,
                output_shaft2,
                initial_y1,
                initial_y2,
            } => {
                let x = self.shaft(*input_shaft)?;
                // a lone second output moves into the first slot
                let ys: Vec<(ShaftKey, Real)> = [
                    output_shaft1.map(|k| (k, *initial_y1)),
                    output_shaft2.map(|k| (k, *initial_y2)),
                ]
                .into_iter()
                .flatten()
                .collect();
                let Some(&(y1_key, y1_initial)) = ys.first() else {
                    return Err(ProjectError::Validation(
                        crate::ValidationError::MissingReference {
                            id: "outputShaft1".to_string(),
                            context: label,
                        },
                    ));
                };
                let y1 = self.shaft(y1_key)?;
                let (y2, y2_initial) = match ys.get(1) {
                    Some(&(key, initial)) => (Some(self.shaft(key)?), initial),
                    None => (None, 0.0),
                };
                OutputTable::with_initial(x, y1, y2, [0.0, y1_initial, y2_initial]).into()
            }
            ComponentKind::CrossConnect {
                horizontal,
                vertical,
                reversed,
            } => Device::cross_connect(
                self.shaft(*horizontal)?,
                self.shaft(*vertical)?,
                *reversed,
            ),
            ComponentKind::GearPair {
                shaft1,
                shaft2,
                input_ratio,
                output_ratio,
            } => Device::gear_pair(
                self.shaft(*shaft1)?,
                self.shaft(*shaft2)?,
                output_ratio / input_ratio,
            ),
            ComponentKind::Gear {
                horizontal,
                vertical,
            } => Device::gear(self.shaft(*horizontal)?, self.shaft(*vertical)?),
            ComponentKind::Dial { input_shaft } => Dial::new(self.shaft(*input_shaft)?).into(),
            ComponentKind::Label { .. } => {
                debug!(component = %label, "label ignored");
                return Ok(());
            }
        };

        if let ComponentKind::FunctionTable {
            x_max: Some(hi),
            x_min: Some(lo),
            ..
        } = &component.kind
        {
            if hi <= lo {
                warn!(component = %label, x_min = lo, x_max = hi, "empty function table range");
            }
        }

        self.builder.add(label, device);
        Ok(())
    }
}

fn expression_error(component: &ComponentDef, source: ExprError) -> ProjectError {
    ProjectError::Expression {
        component: component.label(),
        source,
    }
}
