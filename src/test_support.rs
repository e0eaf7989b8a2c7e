//! Fakes for the browser seams: a scripted transport, fixed credentials, and
//! recorders for notices and redirects.

use crate::app_lib::{
    AppError,
    api::Credentials,
    notify::{Navigator, Notice, NoticeLevel, Notifier},
    storage::ClientStorage,
    transport::{ApiRequest, ApiResponse, Method, Transport},
};
use crate::features::auth::AuthStore;
use std::{
    cell::RefCell,
    collections::{HashMap, VecDeque},
    future::Future,
    pin::Pin,
    rc::Rc,
    task::{Context, Poll, Waker},
};

type Reply = Result<ApiResponse, AppError>;

#[derive(Default)]
struct FakeState {
    routes: HashMap<(Method, String), VecDeque<Reply>>,
    requests: Vec<ApiRequest>,
    gate: Option<Gate>,
}

/// Replies are scripted per method and path. A route's last reply repeats;
/// unscripted routes answer 404.
#[derive(Clone, Default)]
pub struct FakeTransport {
    state: Rc<RefCell<FakeState>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: Method, path: &str, status: u16, body: &str) {
        self.push(method, path, Ok(ApiResponse::new(status, body)));
    }

    pub fn respond_sequence(&self, method: Method, path: &str, replies: Vec<(u16, &str)>) {
        for (status, body) in replies {
            self.respond(method, path, status, body);
        }
    }

    pub fn fail(&self, method: Method, path: &str, err: AppError) {
        self.push(method, path, Err(err));
    }

    /// Holds every request until the returned gate is released.
    pub fn hold(&self) -> Gate {
        let gate = Gate::default();
        self.state.borrow_mut().gate = Some(gate.clone());
        gate
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.borrow().requests.clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method && request.url == path)
            .collect()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests_to(method, path).len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.state.borrow().requests.last().cloned()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) {
        self.state
            .borrow_mut()
            .routes
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    fn next_reply(&self, method: Method, url: &str) -> Reply {
        let mut state = self.state.borrow_mut();
        match state.routes.get_mut(&(method, url.to_string())) {
            Some(queue) if queue.len() > 1 => queue
                .pop_front()
                .unwrap_or_else(|| Ok(ApiResponse::new(404, ""))),
            Some(queue) => queue
                .front()
                .cloned()
                .unwrap_or_else(|| Ok(ApiResponse::new(404, ""))),
            None => Ok(ApiResponse::new(404, r#"{"detail":"Not Found"}"#)),
        }
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
        let method = request.method;
        let url = request.url.clone();
        let gate = {
            let mut state = self.state.borrow_mut();
            state.requests.push(request);
            state.gate.clone()
        };
        if let Some(gate) = gate {
            gate.wait().await;
        }
        self.next_reply(method, &url)
    }
}

#[derive(Default)]
struct GateState {
    open: bool,
    wakers: Vec<Waker>,
}

#[derive(Clone, Default)]
pub struct Gate {
    state: Rc<RefCell<GateState>>,
}

impl Gate {
    pub fn release(&self) {
        let wakers = {
            let mut state = self.state.borrow_mut();
            state.open = true;
            std::mem::take(&mut state.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }

    fn wait(&self) -> GateWait {
        GateWait { gate: self.clone() }
    }
}

struct GateWait {
    gate: Gate,
}

impl Future for GateWait {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = self.gate.state.borrow_mut();
        if state.open {
            Poll::Ready(())
        } else {
            state.wakers.push(cx.waker().clone());
            Poll::Pending
        }
    }
}

pub struct StaticCredentials {
    session: Option<String>,
    auth: Option<String>,
}

impl StaticCredentials {
    pub fn new(session: Option<&str>, auth: Option<&str>) -> Self {
        Self {
            session: session.map(str::to_string),
            auth: auth.map(str::to_string),
        }
    }
}

impl Credentials for StaticCredentials {
    fn session_token(&self) -> Option<String> {
        self.session.clone()
    }

    fn auth_token(&self) -> Option<String> {
        self.auth.clone()
    }
}

/// Sends no session token and reads the auth token from storage.
pub struct StorageCredentials {
    auth: AuthStore,
}

impl StorageCredentials {
    pub fn new(storage: Rc<dyn ClientStorage>) -> Self {
        Self {
            auth: AuthStore::new(storage),
        }
    }
}

impl Credentials for StorageCredentials {
    fn session_token(&self) -> Option<String> {
        None
    }

    fn auth_token(&self) -> Option<String> {
        self.auth.auth_token()
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn levels(&self) -> Vec<NoticeLevel> {
        self.notices.borrow().iter().map(|notice| notice.level).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.borrow_mut().push(notice);
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    redirects: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str) {
        self.redirects.borrow_mut().push(path.to_string());
    }
}
