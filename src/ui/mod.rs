/// UI module exports

pub mod components;
mod favorites;
pub mod newtab;
mod settings;
mod widgets;

use crate::dashboard::Dashboard;
use crate::platform::PlatformStore;
use std::ops::Deref;
use std::rc::Rc;

/// Shared dashboard passed down as a prop; equal when it is the same instance
#[derive(Clone)]
pub struct DashboardHandle(pub Rc<Dashboard<PlatformStore>>);

impl PartialEq for DashboardHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for DashboardHandle {
    type Target = Dashboard<PlatformStore>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
