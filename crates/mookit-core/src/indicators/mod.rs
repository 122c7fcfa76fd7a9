//! Quality indicators measured against a reference set: the GD/IGD
//! distance family, the additive and multiplicative epsilon, and the
//! exact two-objective R2.

mod epsilon;
mod gd;
mod r2;

pub use epsilon::{
    epsilon_additive, epsilon_additive_ind, epsilon_additive_minmax, epsilon_mult,
    epsilon_mult_minmax,
};
pub use gd::{
    avg_hausdorff_dist, avg_hausdorff_maximise, gd, gd_p, igd, igd_maximise, igd_p, igd_plus,
    igd_plus_maximise,
};
pub use r2::r2_exact;
