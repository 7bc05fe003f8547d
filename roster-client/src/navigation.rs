//! Navigation state machine.
//!
//! Decides which view is active. Every transition is a row of one `match`
//! in [`Navigator::dispatch`]; anything not listed there is rejected with a
//! [`TransitionError`] and leaves the route untouched.
//!
//! | From                | Event          | To                         | Guard              |
//! |---------------------|----------------|----------------------------|--------------------|
//! | `Login`             | `ShowRegister` | `Register`                 |                    |
//! | `Register`          | `Back`         | `Login`                    |                    |
//! | `Login`/`Register`  | `LoggedIn`     | `List`                     | authenticated      |
//! | `List`              | `Select(id)`   | `Detail(id)`               |                    |
//! | `List`              | `Create`       | `Form(Create)`             | role `edit`        |
//! | `Detail(id)`        | `Back`         | `List`                     |                    |
//! | `Detail(id)`        | `Edit(record)` | `Form(Edit(record))`       | role `edit`, ids match |
//! | `Detail(id)`        | `Deleted`      | `List`                     | role `edit`        |
//! | `Form`              | `Saved`        | `List`                     |                    |
//! | `Form`              | `Cancel`       | `List` or `Detail(id)`     |                    |
//!
//! The authentication guard is not a transition: [`Navigator::resolve`]
//! applies it whenever the route is read for rendering.

use shared::{Employee, EmployeeId, Role};
use thiserror::Error;

use crate::session::Session;

/// What a form is editing
#[derive(Debug, Clone, PartialEq)]
pub enum FormTarget {
    /// A new draft
    Create,
    /// An existing record, complete
    Edit(Box<Employee>),
}

impl FormTarget {
    pub fn employee_id(&self) -> Option<EmployeeId> {
        match self {
            FormTarget::Create => None,
            FormTarget::Edit(employee) => Some(employee.id),
        }
    }
}

/// Where a cancelled form goes back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTo {
    List,
    Detail(EmployeeId),
}

/// The active view
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    Login,
    Register,
    List,
    Detail(EmployeeId),
    Form { target: FormTarget, return_to: ReturnTo },
}

impl Route {
    /// Whether this view may only be shown to an authenticated user
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login | Route::Register)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Register => "Register",
            Route::List => "List",
            Route::Detail(_) => "Detail",
            Route::Form { .. } => "Form",
        }
    }
}

/// User actions and async completions that move between views
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ShowRegister,
    Back,
    LoggedIn,
    Select(EmployeeId),
    Create,
    Edit(Employee),
    Deleted,
    Saved,
    Cancel,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::ShowRegister => "ShowRegister",
            Event::Back => "Back",
            Event::LoggedIn => "LoggedIn",
            Event::Select(_) => "Select",
            Event::Create => "Create",
            Event::Edit(_) => "Edit",
            Event::Deleted => "Deleted",
            Event::Saved => "Saved",
            Event::Cancel => "Cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("not logged in")]
    Unauthenticated,

    #[error("role '{required}' required")]
    RoleRequired { required: Role },

    #[error("record {got} cannot be edited from the detail view of {expected}")]
    RecordMismatch { expected: EmployeeId, got: EmployeeId },

    #[error("{event} is not available from {from}")]
    NotAllowed {
        from: &'static str,
        event: &'static str,
    },
}

/// Owner of the current [`Route`]
#[derive(Debug, Clone)]
pub struct Navigator {
    route: Route,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self { route: Route::Login }
    }

    /// The stored route, without applying the session guard
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Applies the session guard and returns the route to render.
    ///
    /// Unauthenticated: authenticated-only routes fall back to `Login`.
    /// Authenticated: `Login`/`Register` move on to `List`.
    pub fn resolve(&mut self, session: &Session) -> &Route {
        let authenticated = session.is_authenticated();
        if authenticated != self.route.requires_auth() {
            let next = if authenticated { Route::List } else { Route::Login };
            tracing::debug!(from = self.route.name(), to = next.name(), "Session guard redirect");
            self.route = next;
        }
        &self.route
    }

    /// Applies an event. On error the route is unchanged.
    pub fn dispatch(&mut self, event: Event, session: &Session) -> Result<&Route, TransitionError> {
        let next = Self::transition(&self.route, event, session)?;
        tracing::debug!(from = self.route.name(), to = next.name(), "Navigate");
        self.route = next;
        Ok(&self.route)
    }

    fn transition(from: &Route, event: Event, session: &Session) -> Result<Route, TransitionError> {
        let authenticated = session.is_authenticated();
        if from.requires_auth() && !authenticated {
            return Err(TransitionError::Unauthenticated);
        }

        let require_edit = || {
            if session.can_edit() {
                Ok(())
            } else {
                Err(TransitionError::RoleRequired {
                    required: Role::Edit,
                })
            }
        };

        match (from, event) {
            (Route::Login, Event::ShowRegister) => Ok(Route::Register),
            (Route::Register, Event::Back) => Ok(Route::Login),
            (Route::Login | Route::Register, Event::LoggedIn) => {
                if authenticated {
                    Ok(Route::List)
                } else {
                    Err(TransitionError::Unauthenticated)
                }
            }

            (Route::List, Event::Select(id)) => Ok(Route::Detail(id)),
            (Route::List, Event::Create) => {
                require_edit()?;
                Ok(Route::Form {
                    target: FormTarget::Create,
                    return_to: ReturnTo::List,
                })
            }

            (Route::Detail(_), Event::Back) => Ok(Route::List),
            (Route::Detail(id), Event::Edit(employee)) => {
                require_edit()?;
                if employee.id != *id {
                    return Err(TransitionError::RecordMismatch {
                        expected: *id,
                        got: employee.id,
                    });
                }
                Ok(Route::Form {
                    target: FormTarget::Edit(Box::new(employee)),
                    return_to: ReturnTo::Detail(*id),
                })
            }
            (Route::Detail(_), Event::Deleted) => {
                require_edit()?;
                Ok(Route::List)
            }

            (Route::Form { .. }, Event::Saved) => Ok(Route::List),
            (Route::Form { return_to, .. }, Event::Cancel) => Ok(match return_to {
                ReturnTo::List => Route::List,
                ReturnTo::Detail(id) => Route::Detail(*id),
            }),

            (from, event) => Err(TransitionError::NotAllowed {
                from: from.name(),
                event: event.name(),
            }),
        }
    }
}
