//! View coordinator.
//!
//! `App` owns the [`Navigator`] and the per-view state (loaded records, the
//! form being edited, the error on display) and drives record
//! synchronization through the [`HttpClient`]. It is single-writer: every
//! action takes `&mut self` and completes before the next one starts.
//!
//! Rendering goes through [`App::render`], which re-applies the session
//! guard first, so a session cleared from anywhere (another holder of the
//! [`SessionStore`], an expired token) is never rendered past.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::{Employee, EmployeeId, Role};
use tokio::sync::watch;

use crate::api::PdfExport;
use crate::error::{ActionError, ClientError, ClientResult, ViewError};
use crate::form::{EmployeeForm, TextField};
use crate::http::HttpClient;
use crate::navigation::{Event, FormTarget, Navigator, Route, TransitionError};
use crate::session::{FileStorage, MemoryStorage, Session, SessionStore};
use crate::ClientConfig;

const SESSION_EXPIRED: &str = "Session expired, please log in again";

/// What the active view shows
#[derive(Debug)]
pub enum Screen<'a> {
    Login {
        error: Option<&'a ViewError>,
    },
    Register {
        error: Option<&'a ViewError>,
        /// Registration went through; the user can go back and log in
        registered: bool,
    },
    List {
        /// Server order. Empty while a load error is shown.
        employees: &'a [Employee],
        /// Whether the list has been fetched at least once
        loaded: bool,
        /// Create affordance, offered to role `edit` only
        can_create: bool,
        pdf_url: String,
        error: Option<&'a ViewError>,
    },
    Detail {
        id: EmployeeId,
        /// `None` until loaded, or when loading failed
        employee: Option<&'a Employee>,
        /// Edit/delete affordances, offered to role `edit` only
        can_edit: bool,
        pdf_url: String,
        error: Option<&'a ViewError>,
    },
    Form {
        form: &'a EmployeeForm,
        /// `Some(id)` when editing an existing record
        editing: Option<EmployeeId>,
        error: Option<&'a ViewError>,
    },
}

/// State of the active view; reset whenever the route changes
#[derive(Debug, Default)]
struct ViewState {
    error: Option<ViewError>,
    registered: bool,
    employees: Vec<Employee>,
    list_loaded: bool,
    detail: Option<Employee>,
    form: Option<EmployeeForm>,
}

#[derive(Debug)]
pub struct App {
    session: Arc<SessionStore>,
    session_rx: watch::Receiver<Session>,
    http: HttpClient,
    navigator: Navigator,
    view: ViewState,
}

impl App {
    /// Creates a coordinator on the session the HTTP client reads from
    pub fn new(http: HttpClient) -> Self {
        let session = http.session().clone();
        let session_rx = session.subscribe();
        Self {
            session,
            session_rx,
            http,
            navigator: Navigator::new(),
            view: ViewState::default(),
        }
    }

    /// Builds storage, session and HTTP client from configuration and
    /// restores a persisted session.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let session = match &config.session_path {
            Some(path) => SessionStore::new(FileStorage::new(path)),
            None => SessionStore::new(MemoryStorage::new()),
        };
        session.hydrate();
        let http = HttpClient::new(config, Arc::new(session))?;
        Ok(Self::new(http))
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// The route to render, after the session guard
    pub fn route(&mut self) -> &Route {
        self.resolve();
        self.navigator.route()
    }

    /// Error currently on display
    pub fn error(&self) -> Option<&ViewError> {
        self.view.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.view.error = None;
    }

    /// The form being edited, when a form is active
    pub fn form_mut(&mut self) -> Option<&mut EmployeeForm> {
        self.resolve();
        match self.navigator.route() {
            Route::Form { target, .. } => {
                Some(self.view.form.get_or_insert_with(|| form_for(target)))
            }
            _ => None,
        }
    }

    /// Sets a form field by key.
    ///
    /// `previous_experience` and `salary_history` take a JSON array. Malformed
    /// input is shown as [`ViewError::MalformedInput`] and the field keeps its
    /// previous value.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), ActionError> {
        let from = self.resolve().name();
        let Some(form) = self.form_mut() else {
            return Err(TransitionError::NotAllowed { from, event: "Set" }.into());
        };

        let result = match key {
            "previous_experience" => form.set_experience_json(value).map_err(|e| e.to_string()),
            "salary_history" => form.set_salary_json(value).map_err(|e| e.to_string()),
            other => match TextField::from_key(other) {
                Some(field) => {
                    form.set_text(field, value);
                    Ok(())
                }
                None => Err(format!("Unknown field '{other}'")),
            },
        };

        match result {
            Ok(()) => {
                if matches!(self.view.error, Some(ViewError::MalformedInput(_))) {
                    self.view.error = None;
                }
                Ok(())
            }
            Err(message) => Err(self.show(ViewError::MalformedInput(message))),
        }
    }

    /// Fetches whatever the active view needs and has not loaded yet
    pub async fn sync(&mut self) {
        self.resolve();
        match self.navigator.route().clone() {
            Route::List if !self.view.list_loaded => {
                let _ = self.load_list().await;
            }
            Route::Detail(id) if self.view.detail.is_none() && self.view.error.is_none() => {
                let _ = self.load_detail(id).await;
            }
            _ => {}
        }
    }

    /// Snapshot of the active view
    pub fn render(&mut self) -> Screen<'_> {
        let route = self.resolve().clone();
        let can_edit = self.session.snapshot().can_edit();
        let view = &mut self.view;
        let error = view.error.as_ref();

        match route {
            Route::Login => Screen::Login { error },
            Route::Register => Screen::Register {
                error,
                registered: view.registered,
            },
            Route::List => Screen::List {
                employees: &view.employees,
                loaded: view.list_loaded,
                can_create: can_edit,
                pdf_url: self.http.pdf_url(PdfExport::All),
                error,
            },
            Route::Detail(id) => Screen::Detail {
                id,
                employee: view.detail.as_ref(),
                can_edit,
                pdf_url: self.http.pdf_url(PdfExport::Employee(id)),
                error,
            },
            Route::Form { target, .. } => {
                let form = view.form.get_or_insert_with(|| form_for(&target));
                Screen::Form {
                    form,
                    editing: target.employee_id(),
                    error: view.error.as_ref(),
                }
            }
        }
    }

    // ========== Login / Register ==========

    pub fn show_register(&mut self) -> Result<(), ActionError> {
        self.navigate(Event::ShowRegister)
    }

    /// Authenticates, stores the session and opens the list.
    ///
    /// Bad credentials leave the user on the login view with an
    /// [`ViewError::Auth`] shown.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ActionError> {
        self.require_anonymous_route("Login")?;
        self.view.error = None;

        if username.trim().is_empty() || password.is_empty() {
            return Err(self.show(ViewError::Auth("Username and password are required".into())));
        }

        let resp = match self.http.login(username.trim(), password).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::info!(username, "Login rejected: {}", e);
                return Err(self.show(ViewError::Auth(credential_message(e, "Login failed"))));
            }
        };

        let role = match resp.role.parse::<Role>() {
            Ok(role) => role,
            Err(e) => {
                tracing::warn!("Login response carried {}", e);
                return Err(self.show(ViewError::Auth(format!("Login failed: {e}"))));
            }
        };
        if let Err(e) = self.session.login(resp.access_token, role) {
            return Err(self.show(ViewError::Auth(format!("Login failed: {e}"))));
        }
        self.observe_session();

        // dispatched before the guard gets a chance to redirect
        self.navigator.dispatch(Event::LoggedIn, &self.session.snapshot())?;
        self.view = ViewState::default();
        self.load_list().await?;
        Ok(())
    }

    /// Creates an account. Stays on the register view and flags success.
    pub async fn register(
        &mut self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<(), ActionError> {
        self.resolve();
        if self.navigator.route() != &Route::Register {
            return Err(TransitionError::NotAllowed {
                from: self.navigator.route().name(),
                event: "Register",
            }
            .into());
        }
        self.view.error = None;
        self.view.registered = false;

        if username.trim().is_empty() || password.is_empty() {
            return Err(self.show(ViewError::Auth("Username and password are required".into())));
        }

        match self.http.register(username.trim(), password, role).await {
            Ok(_) => {
                self.view.registered = true;
                Ok(())
            }
            Err(e) => Err(self.show(ViewError::Auth(credential_message(e, "Registration failed")))),
        }
    }

    /// Clears the session; the guard takes the user to the login view
    pub fn logout(&mut self) {
        self.session.logout();
        self.resolve();
    }

    // ========== Records ==========

    /// Re-fetches the data of the active view
    pub async fn refresh(&mut self) -> Result<(), ActionError> {
        self.resolve();
        self.view.error = None;
        match self.navigator.route().clone() {
            Route::List => self.load_list().await?,
            Route::Detail(id) => self.load_detail(id).await?,
            _ => {}
        }
        Ok(())
    }

    /// Opens the detail view of an employee and loads it
    pub async fn select(&mut self, id: EmployeeId) -> Result<(), ActionError> {
        self.navigate(Event::Select(id))?;
        self.load_detail(id).await?;
        Ok(())
    }

    /// Goes back: Register → Login, Detail → List
    pub async fn back(&mut self) -> Result<(), ActionError> {
        self.navigate(Event::Back)?;
        self.sync().await;
        Ok(())
    }

    /// Opens an empty form (role `edit`)
    pub fn create(&mut self) -> Result<(), ActionError> {
        self.navigate(Event::Create)?;
        self.view.form = Some(EmployeeForm::new());
        Ok(())
    }

    /// Opens the form on the record shown by the detail view (role `edit`).
    ///
    /// The form always starts from the complete record: if the detail view
    /// has not loaded it, it is fetched first.
    pub async fn edit(&mut self) -> Result<(), ActionError> {
        self.resolve();
        let Route::Detail(id) = *self.navigator.route() else {
            return Err(TransitionError::NotAllowed {
                from: self.navigator.route().name(),
                event: "Edit",
            }
            .into());
        };
        if !self.session.snapshot().can_edit() {
            return Err(TransitionError::RoleRequired {
                required: Role::Edit,
            }
            .into());
        }

        let employee = match self.view.detail.take() {
            Some(employee) if employee.id == id => employee,
            _ => {
                self.load_detail(id).await?;
                match self.view.detail.take() {
                    Some(employee) => employee,
                    None => return Err(self.show(ViewError::Load("Failed to load employee".into()))),
                }
            }
        };

        let form = EmployeeForm::from_employee(&employee);
        if let Err(e) = self.navigate(Event::Edit(employee.clone())) {
            self.view.detail = Some(employee);
            return Err(e);
        }
        self.view.form = Some(form);
        Ok(())
    }

    /// Validates and submits the form.
    ///
    /// On success the list is shown again. On failure the form and its
    /// input stay as they were, with the error displayed.
    pub async fn save(&mut self) -> Result<Employee, ActionError> {
        self.resolve();
        let target = match self.navigator.route() {
            Route::Form { target, .. } => target.clone(),
            other => {
                return Err(TransitionError::NotAllowed {
                    from: other.name(),
                    event: "Save",
                }
                .into());
            }
        };
        self.view.error = None;

        let form = self.view.form.get_or_insert_with(|| form_for(&target));
        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(e) => return Err(self.show(ViewError::MalformedInput(e.to_string()))),
        };

        let result = match target.employee_id() {
            None => self.http.create_employee(&draft).await,
            Some(id) => self.http.update_employee(id, &draft).await,
        };
        let employee = match result {
            Ok(employee) => employee,
            Err(e) => return Err(self.fail(e, ViewError::Save, "Failed to save employee").into()),
        };

        self.navigate(Event::Saved)?;
        let _ = self.load_list().await;
        Ok(employee)
    }

    /// Leaves the form without saving
    pub async fn cancel(&mut self) -> Result<(), ActionError> {
        self.navigate(Event::Cancel)?;
        self.sync().await;
        Ok(())
    }

    /// Deletes the record shown by the detail view (role `edit`)
    pub async fn delete(&mut self) -> Result<(), ActionError> {
        self.resolve();
        let Route::Detail(id) = *self.navigator.route() else {
            return Err(TransitionError::NotAllowed {
                from: self.navigator.route().name(),
                event: "Deleted",
            }
            .into());
        };
        if !self.session.snapshot().can_edit() {
            return Err(TransitionError::RoleRequired {
                required: Role::Edit,
            }
            .into());
        }
        self.view.error = None;

        if let Err(e) = self.http.delete_employee(id).await {
            return Err(self.fail(e, ViewError::Save, "Failed to delete employee").into());
        }

        self.navigate(Event::Deleted)?;
        let _ = self.load_list().await;
        Ok(())
    }

    /// Saves the PDF export of the active view (all employees from the
    /// list, one employee from its detail view) into `dir`.
    pub async fn download_pdf(&mut self, dir: &Path) -> Result<PathBuf, ActionError> {
        self.resolve();
        let export = match *self.navigator.route() {
            Route::List => PdfExport::All,
            Route::Detail(id) => PdfExport::Employee(id),
            ref other => {
                return Err(TransitionError::NotAllowed {
                    from: other.name(),
                    event: "DownloadPdf",
                }
                .into());
            }
        };

        let dest = dir.join(export.file_name());
        match self.http.download_pdf(export, &dest).await {
            Ok(_) => Ok(dest),
            Err(e) => Err(self.fail(e, ViewError::Load, "Failed to download PDF").into()),
        }
    }

    // ========== Internals ==========

    async fn load_list(&mut self) -> Result<(), ViewError> {
        match self.http.list_employees().await {
            Ok(employees) => {
                self.view.employees = employees;
                self.view.list_loaded = true;
                Ok(())
            }
            Err(e) => {
                self.view.employees.clear();
                self.view.list_loaded = true;
                Err(self.fail(e, ViewError::Load, "Failed to load employees"))
            }
        }
    }

    async fn load_detail(&mut self, id: EmployeeId) -> Result<(), ViewError> {
        match self.http.get_employee(id).await {
            Ok(employee) => {
                self.view.detail = Some(employee);
                Ok(())
            }
            Err(e) => {
                self.view.detail = None;
                Err(self.fail(e, ViewError::Load, "Failed to load employee"))
            }
        }
    }

    /// Applies an event and resets the view state for the new route
    fn navigate(&mut self, event: Event) -> Result<(), ActionError> {
        self.resolve();
        let session = self.session.snapshot();
        if let Err(e) = self.navigator.dispatch(event, &session) {
            tracing::warn!("Navigation blocked: {}", e);
            return Err(e.into());
        }
        self.view = ViewState::default();
        Ok(())
    }

    /// Re-applies the session guard; a redirect discards the old view state
    fn resolve(&mut self) -> &Route {
        self.observe_session();
        let before = self.navigator.route().name();
        let session = self.session.snapshot();
        if self.navigator.resolve(&session).name() != before {
            self.view = ViewState::default();
        }
        self.navigator.route()
    }

    /// Drops records held for a session that has ended
    fn observe_session(&mut self) {
        if self.session_rx.has_changed().unwrap_or(false)
            && !self.session_rx.borrow_and_update().is_authenticated()
        {
            self.view.employees.clear();
            self.view.detail = None;
            self.view.form = None;
        }
    }

    fn require_anonymous_route(&mut self, event: &'static str) -> Result<(), TransitionError> {
        match self.resolve() {
            Route::Login | Route::Register => Ok(()),
            other => Err(TransitionError::NotAllowed {
                from: other.name(),
                event,
            }),
        }
    }

    fn show(&mut self, error: ViewError) -> ActionError {
        self.view.error = Some(error.clone());
        error.into()
    }

    /// Maps a failed record operation onto the view error taxonomy.
    ///
    /// A rejected bearer token ends the session instead.
    fn fail(
        &mut self,
        err: ClientError,
        kind: fn(String) -> ViewError,
        context: &str,
    ) -> ViewError {
        let error = if err.is_unauthorized() {
            tracing::warn!("Token rejected by server, logging out");
            self.logout();
            ViewError::Auth(SESSION_EXPIRED.into())
        } else {
            tracing::warn!("{}: {}", context, err);
            kind(format!("{context}: {err}"))
        };
        self.view.error = Some(error.clone());
        error
    }
}

fn form_for(target: &FormTarget) -> EmployeeForm {
    match target {
        FormTarget::Create => EmployeeForm::new(),
        FormTarget::Edit(employee) => EmployeeForm::from_employee(employee),
    }
}

/// Server message for rejected credentials, or a generic fallback
fn credential_message(err: ClientError, fallback: &str) -> String {
    match err {
        ClientError::Unauthorized(m)
        | ClientError::Forbidden(m)
        | ClientError::Validation(m)
        | ClientError::NotFound(m) => m,
        other => format!("{fallback}: {other}"),
    }
}
