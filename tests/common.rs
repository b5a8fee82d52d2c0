//! Common test utilities: deterministic ports and tree builders.
use bunki::prelude::*;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

#[allow(dead_code)]
pub const BOX_WIDTH: f64 = 160.0;
#[allow(dead_code)]
pub const BOX_HEIGHT: f64 = 60.0;

/// A measured box at the viewport origin with the standard test extent.
#[allow(dead_code)]
pub fn screen_box() -> NodeBox {
    NodeBox {
        x: 0.0,
        y: 0.0,
        width: BOX_WIDTH,
        height: BOX_HEIGHT,
    }
}

/// Store backed by a shared map, recording every persisted template.
#[allow(dead_code)]
pub struct MemoryStore {
    templates: Mutex<HashMap<TreeId, TreeTemplate>>,
    persisted: Mutex<Vec<TreeTemplate>>,
}

#[allow(dead_code)]
impl MemoryStore {
    pub fn with_template(template: TreeTemplate) -> Arc<Self> {
        let store = Self {
            templates: Mutex::new(HashMap::new()),
            persisted: Mutex::new(Vec::new()),
        };
        store
            .templates
            .lock()
            .unwrap()
            .insert(template.id, template);
        Arc::new(store)
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self {
            templates: Mutex::new(HashMap::new()),
            persisted: Mutex::new(Vec::new()),
        })
    }

    pub fn persist_count(&self) -> usize {
        self.persisted.lock().unwrap().len()
    }

    pub fn last_persisted(&self) -> Option<TreeTemplate> {
        self.persisted.lock().unwrap().last().cloned()
    }
}

impl TemplateStore for MemoryStore {
    fn load(&self, id: TreeId) -> Option<TreeTemplate> {
        self.templates.lock().unwrap().get(&id).cloned()
    }

    fn persist(&self, template: &TreeTemplate) {
        self.templates
            .lock()
            .unwrap()
            .insert(template.id, template.clone());
        self.persisted.lock().unwrap().push(template.clone());
    }
}

/// Measure port over a shared, test-mutable box map with a query counter.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct SharedBoxes {
    boxes: Rc<RefCell<HashMap<NodeId, NodeBox>>>,
    queries: Rc<RefCell<usize>>,
}

#[allow(dead_code)]
impl SharedBoxes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, id: NodeId, node_box: NodeBox) {
        self.boxes.borrow_mut().insert(id, node_box);
    }

    pub fn clear(&self, id: NodeId) {
        self.boxes.borrow_mut().remove(&id);
    }

    pub fn queries(&self) -> usize {
        *self.queries.borrow()
    }

    pub fn reset_queries(&self) {
        *self.queries.borrow_mut() = 0;
    }
}

impl MeasurePort for SharedBoxes {
    fn measure(&self, id: NodeId) -> Option<NodeBox> {
        *self.queries.borrow_mut() += 1;
        self.boxes.borrow().get(&id).copied()
    }
}

struct ManualTask {
    cancelled: Arc<AtomicBool>,
    task: Option<Box<dyn FnOnce() + Send>>,
}

/// Timer that only fires when the test says so. Clones share one task list.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct ManualTimer {
    tasks: Rc<RefCell<Vec<ManualTask>>>,
}

#[allow(dead_code)]
impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total tasks ever scheduled, fired or not.
    pub fn scheduled(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Runs every task that is still alive, oldest first; returns how many
    /// fired.
    pub fn fire_pending(&self) -> usize {
        let mut fired = 0;
        for entry in self.tasks.borrow_mut().iter_mut() {
            if entry.cancelled.load(Ordering::SeqCst) {
                continue;
            }
            if let Some(task) = entry.task.take() {
                task();
                fired += 1;
            }
        }
        fired
    }
}

impl TimerPort for ManualTimer {
    fn schedule(&self, _delay: Duration, task: Box<dyn FnOnce() + Send>) -> TimerHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.tasks.borrow_mut().push(ManualTask {
            cancelled: Arc::clone(&cancelled),
            task: Some(task),
        });
        TimerHandle::new(move || cancelled.store(true, Ordering::SeqCst))
    }
}

/// Catalog with a fixed pair of lists.
#[allow(dead_code)]
pub struct TestCatalog {
    tests: Vec<String>,
    commands: Vec<String>,
}

#[allow(dead_code)]
impl TestCatalog {
    pub fn new() -> Self {
        Self {
            tests: vec![
                "temperature above".to_string(),
                "obstacle ahead".to_string(),
            ],
            commands: vec!["advance".to_string(), "retreat".to_string()],
        }
    }
}

impl Catalog for TestCatalog {
    fn decision_tests(&self) -> &[String] {
        &self.tests
    }

    fn action_commands(&self) -> &[String] {
        &self.commands
    }
}

#[allow(dead_code)]
pub fn branch_map(pairs: &[(&str, Option<NodeId>)]) -> Branches {
    pairs
        .iter()
        .map(|(label, target)| (label.to_string(), *target))
        .collect()
}

#[allow(dead_code)]
pub fn start_node(next: Branches) -> Node {
    Node::Start {
        id: NodeId::fresh(),
        x: 0.0,
        y: 0.0,
        next,
    }
}

#[allow(dead_code)]
pub fn decision_node(test: &str, next: Branches) -> Node {
    Node::Decision {
        id: NodeId::fresh(),
        x: 0.0,
        y: 0.0,
        test: test.to_string(),
        next,
    }
}

#[allow(dead_code)]
pub fn action_node(command: &str) -> Node {
    Node::Action {
        id: NodeId::fresh(),
        x: 0.0,
        y: 0.0,
        command: command.to_string(),
    }
}

#[allow(dead_code)]
pub fn template_with(nodes: Vec<Node>) -> TreeTemplate {
    TreeTemplate {
        id: TreeId::fresh(),
        name: "patrol".to_string(),
        tree: nodes,
    }
}

/// A loaded graph plus handles to all of its fake collaborators.
#[allow(dead_code)]
pub struct Harness {
    pub graph: Graph,
    pub store: Arc<MemoryStore>,
    pub timer: ManualTimer,
    pub boxes: SharedBoxes,
}

/// Builds a graph over deterministic ports from `template`.
#[allow(dead_code)]
pub fn harness(template: TreeTemplate) -> Harness {
    let id = template.id;
    let store = MemoryStore::with_template(template);
    let timer = ManualTimer::new();
    let boxes = SharedBoxes::new();

    let graph = Graph::builder(id, store.clone())
        .with_measure(boxes.clone())
        .with_catalog(TestCatalog::new())
        .with_timer(timer.clone())
        .build()
        .expect("template is present in the store");

    Harness {
        graph,
        store,
        timer,
        boxes,
    }
}
