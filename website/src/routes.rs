use tribuna::route::FullRoute;
use tribuna::routes;

use crate::pages::{Debate, Home};

/// The archive's route table: one page per debate, plus the home page
/// listing them all.
pub static ROUTES: &[&dyn FullRoute] = routes![Debate, Home];
