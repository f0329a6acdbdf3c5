//! A task-tracker page driven by the client-side router.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spa_server::routing::{
    Access, Application, Document, Link, MemoryDocument, MemoryHistory, NavigationEnvironment,
    Route, RouteDef, Transition, View, ViewContext,
};

struct Dashboard;

impl View for Dashboard {
    fn id(&self) -> &str {
        "dashboard"
    }

    fn title(&self) -> Option<&str> {
        Some("Dashboard")
    }
}

struct Task;

impl View for Task {
    fn id(&self) -> &str {
        "task"
    }

    fn title(&self) -> Option<&str> {
        Some("Task")
    }
}

/// Shows the id of the selected task.
struct TaskItem {
    task_id: Rc<RefCell<String>>,
}

impl View for TaskItem {
    fn id(&self) -> &str {
        "task-item"
    }

    fn title(&self) -> Option<&str> {
        Some("Task Item")
    }

    fn on_enter(&mut self, cx: &mut ViewContext<'_>) {
        *self.task_id.borrow_mut() = cx.state.params().get("id").cloned().unwrap_or_default();
    }

    fn on_exit(&mut self, _cx: &mut ViewContext<'_>) {
        self.task_id.borrow_mut().clear();
    }
}

struct Settings;

impl View for Settings {
    fn id(&self) -> &str {
        "settings"
    }
}

struct Login;

impl View for Login {
    fn id(&self) -> &str {
        "login"
    }

    fn title(&self) -> Option<&str> {
        Some("Sign in")
    }
}

const MOUNT_POINTS: [&str; 5] = ["dashboard", "task", "task-item", "settings", "login"];

struct Page {
    app: Application<MemoryHistory, MemoryDocument>,
    task_id: Rc<RefCell<String>>,
    signed_in: Rc<Cell<bool>>,
    routed: Rc<RefCell<Vec<String>>>,
}

fn page(start: &str) -> Page {
    let task_id = Rc::new(RefCell::new(String::new()));
    let signed_in = Rc::new(Cell::new(true));
    let routed = Rc::new(RefCell::new(Vec::new()));

    let item_id = task_id.clone();
    let routes = vec![
        RouteDef::new("/", || Dashboard),
        RouteDef::new("/task", || Task),
        RouteDef::new("/task/[id]", move || TaskItem { task_id: item_id }),
        RouteDef::new("/settings", || Settings),
        RouteDef::new("/login", || Login),
    ];

    let env = MemoryHistory::new("https://localhost:8443", start).unwrap();
    let doc = MemoryDocument::new("Tasks", MOUNT_POINTS);

    let gate_state = signed_in.clone();
    let log = routed.clone();
    let app = Application::new(routes, env, doc)
        .unwrap()
        .with_security(move |route: &Route| {
            let public = matches!(route.path(), "/" | "/login");
            Access::from((!public && !gate_state.get(), Some("/login".to_string())))
        })
        .with_on_route(move |route: &Route| log.borrow_mut().push(route.path().to_string()));

    Page {
        app,
        task_id,
        signed_in,
        routed,
    }
}

#[test]
fn test_views_start_hidden() {
    let page = page("/");
    for id in MOUNT_POINTS {
        assert!(!page.app.document().is_visible(id), "{} visible before start", id);
    }
    // A view without a title keeps the document title it was mounted with
    assert_eq!(page.app.view("settings").map(|v| v.title()), Some("Tasks"));
}

#[test]
fn test_deep_link_to_task_item() {
    let mut page = page("/task//42/?sort=due#notes");
    assert_eq!(page.app.start(), Transition::Entered(2));

    assert_eq!(page.app.pathname(), "/task/42");
    assert_eq!(page.app.params().get("id").map(String::as_str), Some("42"));
    assert_eq!(page.app.queries().get("sort").map(String::as_str), Some("due"));
    assert_eq!(page.app.hash(), "#notes");
    assert_eq!(*page.task_id.borrow(), "42");
    assert_eq!(page.app.document().title(), "Task Item");
    assert_eq!(page.app.environment().location(), "/task/42?sort=due#notes");
}

#[test]
fn test_walk_through_views() {
    let mut page = page("/");
    page.app.start();

    page.app.click(&Link::routed("/task"));
    page.app.click(&Link::routed("/task/7"));
    assert_eq!(*page.task_id.borrow(), "7");

    page.app.navigate("/settings");
    assert!(page.task_id.borrow().is_empty());
    assert_eq!(page.app.document().visible(), vec!["settings"]);

    page.app.back();
    assert_eq!(page.app.pathname(), "/task/7");
    assert_eq!(*page.task_id.borrow(), "7");

    assert_eq!(*page.routed.borrow(), vec!["/", "/task", "/task/[id]", "/settings", "/task/[id]"]);
}

#[test]
fn test_signed_out_user_is_sent_to_login() {
    let mut page = page("/");
    page.app.start();
    page.signed_in.set(false);

    let t = page.app.navigate("/task");
    assert_eq!(t, Transition::Redirected { from: 1, to: 4 });
    assert_eq!(page.app.pathname(), "/login");
    assert_eq!(page.app.document().visible(), vec!["login"]);
    assert_eq!(page.app.document().title(), "Sign in");
    assert_eq!(page.routed.borrow().last().map(String::as_str), Some("/login"));
    assert_eq!(page.app.environment().location(), "/login");

    // Signing in and navigating again reaches the task list
    page.signed_in.set(true);
    assert_eq!(page.app.navigate("/task"), Transition::Entered(1));
    assert_eq!(page.app.document().visible(), vec!["task"]);
}

#[test]
fn test_repeat_navigation_is_quiet() {
    let mut page = page("/");
    page.app.start();
    page.app.navigate("/settings");
    let calls = page.routed.borrow().len();

    assert_eq!(page.app.navigate("/settings/"), Transition::Unchanged(3));
    assert_eq!(page.routed.borrow().len(), calls);
    assert_eq!(page.app.environment().location(), "/settings");
}

#[test]
fn test_unknown_path_shows_dashboard() {
    let mut page = page("/reports/2024");
    assert_eq!(page.app.start(), Transition::Entered(0));
    assert_eq!(page.app.pathname(), "/");
    assert_eq!(page.app.environment().location(), "/");
    assert_eq!(page.app.document().title(), "Dashboard");
}
