//! Linear program construction for the single-bus energy balance.

use good_lp::{Constraint, Expression, ProblemVariables, Variable, constraint, variable};
use tracing::{debug, instrument};

use super::profile::ProfileSeries;
use super::scenario::{Scenario, Technology};
use crate::error::ConfigurationError;

/// Handles of every decision variable, indexed by time step.
#[derive(Debug, Clone)]
pub struct ModelVariables {
    /// Dispatch per fixed-capacity technology, outer index is [`Technology::index`].
    dispatch: Vec<Vec<Variable>>,
    /// Optimized residual generator capacity (MW).
    pub residual_capacity: Variable,
    /// Residual generator dispatch (MW).
    pub residual_dispatch: Vec<Variable>,
    /// Battery charging power drawn from the bus (MW).
    pub charge: Vec<Variable>,
    /// Battery discharging power delivered to the bus (MW).
    pub discharge: Vec<Variable>,
    /// Battery state of charge at the end of each step (MWh).
    pub soc: Vec<Variable>,
}

impl ModelVariables {
    /// Dispatch variables of `tech`, one per time step.
    pub fn dispatch(&self, tech: Technology) -> &[Variable] {
        &self.dispatch[tech.index()]
    }
}

/// Cost coefficients of the objective, kept to report the optimal cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectiveTerms {
    /// Snapshot weighting applied to every per-step cost (hours).
    pub step_hours: f64,
    pub residual_marginal_cost: f64,
    pub residual_capital_cost: f64,
    pub tie_break_cost: f64,
}

/// A fully constructed linear program, ready to be handed to the optimizer.
pub struct Model {
    problem: ProblemVariables,
    objective: Expression,
    constraints: Vec<Constraint>,
    variables: ModelVariables,
    terms: ObjectiveTerms,
}

impl Model {
    pub fn variables(&self) -> &ModelVariables {
        &self.variables
    }

    pub fn objective_terms(&self) -> ObjectiveTerms {
        self.terms
    }

    /// Number of time steps in the horizon.
    pub fn horizon(&self) -> usize {
        self.variables.residual_dispatch.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        ProblemVariables,
        Expression,
        Vec<Constraint>,
        ModelVariables,
        ObjectiveTerms,
    ) {
        (
            self.problem,
            self.objective,
            self.constraints,
            self.variables,
            self.terms,
        )
    }
}

/// Builds the energy balance linear program for `scenario` over `profiles`.
///
/// Per step `t` with step width `w` hours:
///
/// ```text
/// sum_g p_g(t) + r(t) + d(t) - c(t) = load(t)
/// 0 <= p_g(t) <= cap_g * avail_g(t)
/// 0 <= r(t) <= R,  R >= R_min  (R <= R_max if set)
/// soc(t) = soc(t-1) * (1 - loss)^w + w * (c(t) * eta_c - d(t) / eta_d)
/// ```
///
/// with `soc(-1) = soc(last)`, and minimizes
/// `capital * R + sum_t w * (marginal * r(t) + epsilon * sum_g p_g(t))`.
///
/// # Errors
///
/// Returns [`ConfigurationError::EmptyHorizon`] for an empty series and
/// [`ConfigurationError::InvalidFields`] if the scenario or profiles are invalid.
#[instrument(skip_all, fields(steps = profiles.len()))]
pub fn build_model(
    scenario: &Scenario,
    profiles: &ProfileSeries,
) -> Result<Model, ConfigurationError> {
    if profiles.is_empty() {
        return Err(ConfigurationError::EmptyHorizon);
    }
    let mut errors = scenario.validate();
    errors.extend(profiles.validate());
    if !errors.is_empty() {
        return Err(ConfigurationError::InvalidFields(errors));
    }

    let n = profiles.len();
    let w = profiles.step_hours();
    let load_mw = profiles.load_mw(scenario.annual_load_mwh);
    let bat = &scenario.battery;
    let res = &scenario.residual;

    let mut problem = ProblemVariables::new();

    let mut dispatch = Vec::with_capacity(Technology::COUNT);
    for tech in Technology::ALL {
        let capacity = scenario.capacities.get(tech);
        let mut vars = Vec::with_capacity(n);
        for point in profiles.points() {
            let ceiling = capacity * point.availability(tech);
            vars.push(problem.add(variable().min(0.0).max(ceiling)));
        }
        dispatch.push(vars);
    }

    let residual_capacity = problem.add(variable().min(res.min_installed_mw));
    let residual_dispatch = problem.add_vector(variable().min(0.0), n);
    let charge = problem.add_vector(variable().min(0.0).max(bat.power_mw), n);
    let discharge = problem.add_vector(variable().min(0.0).max(bat.power_mw), n);
    let soc = problem.add_vector(variable().min(0.0).max(bat.energy_capacity_mwh()), n);

    let mut constraints = Vec::with_capacity(3 * n + 1);

    // Upper bound as a row so that max < min surfaces as infeasible.
    if let Some(max) = res.max_installed_mw {
        constraints.push(constraint!(residual_capacity <= max));
    }

    let retention = (1.0 - bat.standing_loss).powf(w);
    let store_gain = w * bat.charge_efficiency;
    let dispatch_drain = w / bat.discharge_efficiency;

    for t in 0..n {
        let mut supply = Expression::from(residual_dispatch[t]);
        for vars in &dispatch {
            supply += vars[t];
        }
        supply += discharge[t];
        supply -= charge[t];
        constraints.push(constraint!(supply == load_mw[t]));

        constraints.push(constraint!(residual_dispatch[t] <= residual_capacity));

        let prev = if t == 0 { n - 1 } else { t - 1 };
        constraints.push(constraint!(
            soc[t] == retention * soc[prev] + store_gain * charge[t] - dispatch_drain * discharge[t]
        ));
    }

    let mut objective = res.capital_cost * residual_capacity;
    let marginal = w * res.marginal_cost;
    let tie_break = w * scenario.tie_break_cost;
    for t in 0..n {
        objective += marginal * residual_dispatch[t];
        for vars in &dispatch {
            objective += tie_break * vars[t];
        }
    }

    debug!(
        step_hours = w,
        constraints = constraints.len(),
        battery_energy_mwh = bat.energy_capacity_mwh(),
        "built energy balance model"
    );

    Ok(Model {
        problem,
        objective,
        constraints,
        variables: ModelVariables {
            dispatch,
            residual_capacity,
            residual_dispatch,
            charge,
            discharge,
            soc,
        },
        terms: ObjectiveTerms {
            step_hours: w,
            residual_marginal_cost: res.marginal_cost,
            residual_capital_cost: res.capital_cost,
            tie_break_cost: scenario.tie_break_cost,
        },
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::*;
    use crate::model::profile::ProfilePoint;
    use crate::model::scenario::{BatteryParams, Capacities, ResidualParams};

    fn scenario() -> Scenario {
        Scenario {
            capacities: Capacities {
                pv_mw: 10.0,
                ..Capacities::default()
            },
            battery: BatteryParams {
                power_mw: 1.0,
                duration_hours: 2.0,
                charge_efficiency: 0.9,
                discharge_efficiency: 1.0,
                standing_loss: 0.0,
            },
            annual_load_mwh: 24.0,
            residual: ResidualParams {
                marginal_cost: 100.0,
                capital_cost: 1_000.0,
                min_installed_mw: 0.0,
                max_installed_mw: None,
            },
            tie_break_cost: 0.1,
        }
    }

    fn profiles(n: usize) -> ProfileSeries {
        let t0 = NaiveDate::from_ymd_opt(2030, 6, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid timestamp");
        (0..n)
            .map(|h| ProfilePoint {
                time: t0 + Duration::hours(h as i64),
                pv: 0.5,
                wind_on: 0.0,
                wind_off: 0.0,
                biomass: 0.0,
                hydro: 0.0,
                load: 1.0 / n as f64,
            })
            .collect()
    }

    #[test]
    fn empty_profiles_are_rejected() {
        let result = build_model(&scenario(), &ProfileSeries::default());
        assert!(matches!(result, Err(ConfigurationError::EmptyHorizon)));
    }

    #[test]
    fn invalid_scenario_is_rejected_before_building() {
        let mut s = scenario();
        s.battery.charge_efficiency = 0.0;
        let result = build_model(&s, &profiles(4));
        let Err(ConfigurationError::InvalidFields(errors)) = result else {
            panic!("expected invalid fields");
        };
        assert!(errors.iter().any(|e| e.field == "battery.charge_efficiency"));
    }

    #[test]
    fn scenario_and_profile_errors_are_reported_together() {
        let mut s = scenario();
        s.capacities.hydro_mw = -3.0;
        let mut p = profiles(4).points().to_vec();
        p[0].pv = 2.0;
        let result = build_model(&s, &ProfileSeries::new(p));
        let Err(err) = result else {
            panic!("expected configuration error");
        };
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn one_variable_set_per_step() {
        let model = build_model(&scenario(), &profiles(6)).expect("model should build");
        let vars = model.variables();
        assert_eq!(model.horizon(), 6);
        assert_eq!(vars.charge.len(), 6);
        assert_eq!(vars.soc.len(), 6);
        for tech in Technology::ALL {
            assert_eq!(vars.dispatch(tech).len(), 6);
        }
    }

    #[test]
    fn three_rows_per_step() {
        let model = build_model(&scenario(), &profiles(5)).expect("model should build");
        assert_eq!(model.constraint_count(), 15);
    }

    #[test]
    fn max_capacity_adds_a_row() {
        let mut s = scenario();
        s.residual.max_installed_mw = Some(2.0);
        let model = build_model(&s, &profiles(5)).expect("model should build");
        assert_eq!(model.constraint_count(), 16);
    }

    #[test]
    fn objective_terms_carry_step_weighting() {
        let model = build_model(&scenario(), &profiles(3)).expect("model should build");
        let terms = model.objective_terms();
        assert_eq!(terms.step_hours, 1.0);
        assert_eq!(terms.residual_marginal_cost, 100.0);
        assert_eq!(terms.tie_break_cost, 0.1);
    }
}
