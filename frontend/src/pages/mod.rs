use yew_nested_router::Target;

mod dashboard;
mod login;
mod medications;
mod register;

pub use dashboard::*;
pub use login::*;
pub use medications::*;
pub use register::*;

#[derive(Clone, Debug, Default, PartialEq, Eq, Target)]
pub enum AppRoute {
    #[default]
    #[target(index)]
    Home,
    Login,
    Register,
    Dashboard,
    Medications(MedicationRoute),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Target)]
pub enum MedicationRoute {
    #[default]
    Add,
}

/// The view a route mounts. The root and `/login` share the login view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Login,
    Register,
    Dashboard,
    AddMedication,
}

impl AppRoute {
    pub fn view(&self) -> View {
        match self {
            Self::Home | Self::Login => View::Login,
            Self::Register => View::Register,
            Self::Dashboard => View::Dashboard,
            Self::Medications(MedicationRoute::Add) => View::AddMedication,
        }
    }
}
