//! Carbon footprint calculator.
//!
//! Each activity yields a daily emission in grams of CO2, which is then
//! converted g/day -> g/hour -> g/second -> kg/year. Totals are recomputed
//! every tick; nothing accumulates in state.

use crate::scenario::{Params, Sample, ScenarioState};

/// Grid emission factor default (g CO2 per kWh).
pub const DEFAULT_GRID_FACTOR: f64 = 820.0;

/// How an activity turns its parameters into grams per day.
#[derive(Debug, Clone, Copy)]
pub enum Rate {
    /// Appliance drawing `watts` for `hours` per day from the grid.
    Electric {
        watts: (&'static str, f64),
        hours: (&'static str, f64),
    },
    /// A quantity consumed per period with a fixed emission factor.
    PerUnit {
        amount: (&'static str, f64),
        /// g CO2 per unit
        grams_per_unit: f64,
        /// Days the amount covers
        period_days: f64,
    },
}

/// One entry of the activity catalog.
#[derive(Debug, Clone, Copy)]
pub struct Activity {
    /// Column name in the sample
    pub name: &'static str,
    pub rate: Rate,
}

/// The activity catalog.
pub const ACTIVITIES: &[Activity] = &[
    Activity {
        name: "lighting",
        rate: Rate::Electric {
            watts: ("lighting_w", 60.0),
            hours: ("lighting_h", 5.0),
        },
    },
    Activity {
        name: "fan",
        rate: Rate::Electric {
            watts: ("fan_w", 75.0),
            hours: ("fan_h", 8.0),
        },
    },
    Activity {
        name: "air_conditioner",
        rate: Rate::Electric {
            watts: ("ac_w", 1500.0),
            hours: ("ac_h", 4.0),
        },
    },
    Activity {
        name: "computer",
        rate: Rate::Electric {
            watts: ("computer_w", 150.0),
            hours: ("computer_h", 6.0),
        },
    },
    Activity {
        name: "refrigerator",
        rate: Rate::Electric {
            watts: ("fridge_w", 150.0),
            hours: ("fridge_h", 24.0),
        },
    },
    Activity {
        name: "car",
        rate: Rate::PerUnit {
            amount: ("car_km", 20.0),
            grams_per_unit: 170.0,
            period_days: 1.0,
        },
    },
    Activity {
        name: "bus",
        rate: Rate::PerUnit {
            amount: ("bus_km", 10.0),
            grams_per_unit: 80.0,
            period_days: 1.0,
        },
    },
    Activity {
        name: "lpg",
        rate: Rate::PerUnit {
            amount: ("lpg_kg_month", 14.2),
            grams_per_unit: 2983.0,
            period_days: 30.0,
        },
    },
];

/// Daily emission and energy of one activity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DailyEmission {
    pub grams: f64,
    pub kwh: f64,
}

impl Activity {
    /// Evaluate the activity for the given parameters.
    pub fn daily(&self, params: &Params, grid_factor: f64) -> DailyEmission {
        match self.rate {
            Rate::Electric { watts, hours } => {
                let w = params.clamped(watts.0, watts.1, 0.0, 1e7);
                let h = params.clamped(hours.0, hours.1, 0.0, 24.0);
                let kwh = w * h / 1000.0;
                DailyEmission {
                    grams: kwh * grid_factor,
                    kwh,
                }
            }
            Rate::PerUnit {
                amount,
                grams_per_unit,
                period_days,
            } => {
                let units = params.clamped(amount.0, amount.1, 0.0, 1e7);
                DailyEmission {
                    grams: units * grams_per_unit / period_days,
                    kwh: 0.0,
                }
            }
        }
    }
}

/// Grams per day to grams per hour.
pub fn per_hour(grams_per_day: f64) -> f64 {
    grams_per_day / 24.0
}

/// Grams per hour to grams per second.
pub fn per_second(grams_per_hour: f64) -> f64 {
    grams_per_hour / 3600.0
}

/// Grams per second to kilograms per year.
pub fn kg_per_year(grams_per_second: f64) -> f64 {
    grams_per_second * 3600.0 * 24.0 * 365.0 / 1000.0
}

/// Recompute the footprint totals.
pub fn footprint(params: &Params, _state: &mut ScenarioState, _dt: f64) -> Sample {
    let grid_factor = params.clamped("grid_factor", DEFAULT_GRID_FACTOR, 0.0, 5000.0);

    let mut sample = Sample::new(0.0, 0.0, 0.0);
    let mut total_g_day = 0.0;
    let mut total_kwh = 0.0;

    for activity in ACTIVITIES {
        let daily = activity.daily(params, grid_factor);
        total_g_day += daily.grams;
        total_kwh += daily.kwh;
        sample.set(activity.name, kg_per_year(per_second(per_hour(daily.grams))));
    }

    let g_hour = per_hour(total_g_day);
    let g_second = per_second(g_hour);
    let kg_year = kg_per_year(g_second);

    sample.v = g_hour;
    sample.i = g_second;
    sample.p = kg_year;
    sample
        .with("energy_kwh_day", total_kwh)
        .with("total_kg_year", kg_year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn zeroed() -> Params {
        let mut params = Params::new();
        for activity in ACTIVITIES {
            match activity.rate {
                Rate::Electric { watts, .. } => params.set(watts.0, 0.0),
                Rate::PerUnit { amount, .. } => params.set(amount.0, 0.0),
            }
        }
        params
    }

    #[test]
    fn test_unit_pipeline() {
        // 24 g/day is 1 g/h
        assert_relative_eq!(per_hour(24.0), 1.0);
        assert_relative_eq!(per_second(3600.0), 1.0);
        assert_relative_eq!(kg_per_year(per_second(per_hour(1000.0))), 365.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_appliance() {
        // 1 kW for 10 h at 820 g/kWh = 8200 g/day
        let params = zeroed().with("ac_w", 1000.0).with("ac_h", 10.0);
        let s = footprint(&params, &mut ScenarioState::default(), 0.0);
        assert_relative_eq!(s.v, 8200.0 / 24.0, epsilon = 1e-9);
        assert_relative_eq!(s.p, 8200.0 * 365.0 / 1000.0, epsilon = 1e-6);
        assert_relative_eq!(s.number("energy_kwh_day").unwrap(), 10.0);
        assert_relative_eq!(s.number("air_conditioner").unwrap(), s.p, epsilon = 1e-9);
        assert_eq!(s.number("car"), Some(0.0));
    }

    #[test]
    fn test_totals_sum_activities() {
        let s = footprint(&Params::new(), &mut ScenarioState::default(), 0.0);
        let sum: f64 = ACTIVITIES
            .iter()
            .map(|a| s.number(a.name).unwrap())
            .sum();
        assert_relative_eq!(sum, s.number("total_kg_year").unwrap(), epsilon = 1e-6);
        assert_relative_eq!(s.i, s.v / 3600.0);
    }

    #[test]
    fn test_hours_capped_at_day() {
        let params = zeroed().with("fan_w", 100.0).with("fan_h", 30.0);
        let s = footprint(&params, &mut ScenarioState::default(), 0.0);
        assert_relative_eq!(s.number("energy_kwh_day").unwrap(), 2.4);
    }
}
