//! End-to-end scenarios for the tiling core.
//!
//! Each test drives a [`TilingManager`] with the default policies through its
//! public API only: inbound events go through `ingest`, user actions through
//! `invoke`, and outbound requests are read back from a [`RecordingSink`].

use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use trellis_lib::config::{AutomaticTilingDirection, TilingConfig};
use trellis_lib::tiling::{
    Command, ContainerId, Direction, Event, EventKind, EventSubscriber, InsertPosition, MonitorInfo, Outcome,
    RecordingSink, Rect, SideEffect, TilingDirection, TilingError, TilingManager, TilingResult,
    WindowHandle, WindowInfo, WindowSeed,
};

// ============================================================================
// Helpers
// ============================================================================

fn primary() -> MonitorInfo {
    MonitorInfo {
        id: "primary".to_string(),
        rect: Rect::new(0.0, 0.0, 1000.0, 800.0),
        is_primary: true,
    }
}

fn start(config: TilingConfig) -> (TilingManager, RecordingSink) {
    let sink = RecordingSink::new();
    let mut manager = TilingManager::new(config, Box::new(sink.clone()));
    manager.populate(vec![primary()], Vec::new()).unwrap();
    sink.take();
    (manager, sink)
}

fn open(manager: &mut TilingManager, handle: u64) {
    manager.ingest(Event::WindowOpened {
        handle: WindowHandle(handle),
        rect: Rect::new(0.0, 0.0, 400.0, 300.0),
        info: WindowInfo::default(),
    });
}

fn shape(manager: &TilingManager) -> String { manager.snapshot().shape() }

fn positions(effects: &[SideEffect]) -> Vec<(WindowHandle, Rect)> {
    let mut placed: Vec<_> = effects
        .iter()
        .filter_map(|effect| match effect {
            SideEffect::PositionWindow { handle, rect, .. } => Some((*handle, *rect)),
            _ => None,
        })
        .collect();
    placed.sort_by_key(|(handle, _)| *handle);
    placed
}

fn assert_tree_valid(manager: &TilingManager) {
    if let Err(violation) = manager.containers().tree().check_invariants() {
        panic!("tree invariant violated: {violation}\n{}", shape(manager));
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_open_then_move_down_switches_workspace_to_vertical() {
    let (mut manager, sink) = start(TilingConfig::default());
    open(&mut manager, 0xA);
    open(&mut manager, 0xB);
    assert_eq!(shape(&manager), "root(monitor:primary(workspace:1[h](0xa 0xb)))");
    sink.take();

    let outcome = manager.invoke(Command::MoveFocusedWindow { direction: Direction::Down });

    assert_eq!(outcome, Ok(Outcome::Applied));
    assert_eq!(shape(&manager), "root(monitor:primary(workspace:1[v](0xa 0xb)))");
    assert_eq!(
        positions(&sink.take()),
        vec![
            (WindowHandle(0xA), Rect::new(0.0, 0.0, 1000.0, 400.0)),
            (WindowHandle(0xB), Rect::new(0.0, 400.0, 1000.0, 400.0)),
        ]
    );
    assert!(manager.containers().dirty().is_empty());
}

#[test]
fn test_closing_window_collapses_split() {
    let (mut manager, _sink) = start(TilingConfig::default());
    open(&mut manager, 1);
    open(&mut manager, 2);
    manager.invoke(Command::ToggleTilingDirection).unwrap();
    open(&mut manager, 3);
    assert_eq!(shape(&manager), "root(monitor:primary(workspace:1[h](0x1 split[v](0x2 0x3))))");

    manager.ingest(Event::WindowClosed { handle: WindowHandle(3) });

    assert_eq!(shape(&manager), "root(monitor:primary(workspace:1[h](0x1 0x2)))");
    assert_tree_valid(&manager);

    let service = manager.containers();
    let survivor = service.window_by_handle(WindowHandle(2)).unwrap();
    assert_eq!(service.focused_container(), Some(survivor));
    assert_eq!(service.tree().get(survivor).unwrap().rect, Rect::new(500.0, 0.0, 500.0, 800.0));
}

#[test]
fn test_move_at_boundary_is_noop() {
    let (mut manager, sink) = start(TilingConfig::default());
    open(&mut manager, 1);
    open(&mut manager, 2);
    manager.invoke(Command::FocusInDirection { direction: Direction::Left }).unwrap();
    let before = manager.snapshot();
    sink.take();

    let outcome = manager.invoke(Command::MoveFocusedWindow { direction: Direction::Left });

    assert_eq!(outcome, Ok(Outcome::NoOp));
    assert_eq!(manager.snapshot(), before);
    assert!(manager.containers().dirty().is_empty());
    assert!(positions(&sink.take()).is_empty());
}

#[test]
fn test_sole_window_move_switches_direction_only() {
    let config = TilingConfig { tiling_direction: TilingDirection::Vertical, ..Default::default() };
    let (mut manager, _sink) = start(config);
    open(&mut manager, 1);
    assert_eq!(shape(&manager), "root(monitor:primary(workspace:1[v](0x1)))");

    manager.invoke(Command::MoveFocusedWindow { direction: Direction::Right }).unwrap();

    assert_eq!(shape(&manager), "root(monitor:primary(workspace:1[h](0x1)))");
}

#[test]
fn test_alternate_policy_reaches_fixed_point() {
    let config = TilingConfig {
        automatic_tiling_direction: AutomaticTilingDirection::Alternate,
        ..Default::default()
    };
    let (mut manager, _sink) = start(config);
    for handle in 1..=4 {
        open(&mut manager, handle);
    }
    assert_tree_valid(&manager);

    let cycle = |manager: &mut TilingManager| {
        for handle in 1..=4 {
            manager.ingest(Event::ForegroundWindowChanged { handle: WindowHandle(handle) });
        }
        manager.snapshot()
    };

    let first = cycle(&mut manager);
    let second = cycle(&mut manager);
    assert_eq!(first, second);
    assert_eq!(
        first.shape(),
        "root(monitor:primary(workspace:1[h](0x1 split[v](0x2 split[h](0x3 0x4)))))"
    );
}

#[test]
fn test_redraw_positions_each_dirty_window_once() {
    let (mut manager, sink) = start(TilingConfig::default());
    for handle in 1..=3 {
        open(&mut manager, handle);
    }
    sink.take();

    let mut config = TilingConfig::default();
    config.gaps.outer = 10;
    manager.ingest(Event::ConfigReloaded { config: Arc::new(config) });

    let placed = positions(&sink.take());
    assert_eq!(placed.len(), 3);
    let (handle, rect) = placed[0];
    assert_eq!(handle, WindowHandle(1));
    assert!(rect.approx_eq(&Rect::new(10.0, 10.0, 980.0 / 3.0, 780.0), 0.01), "{rect:?}");
    assert!(manager.containers().dirty().is_empty());
}

#[test]
fn test_failed_command_leaves_tree_untouched() {
    let (mut manager, sink) = start(TilingConfig::default());
    open(&mut manager, 1);
    open(&mut manager, 2);
    let before = manager.snapshot();
    sink.take();

    let service = manager.containers();
    let window = service.window_by_handle(WindowHandle(1)).unwrap();
    let workspace = service.tree().workspace_of(window).unwrap();

    let result = manager.invoke(Command::AttachContainer {
        parent: window,
        child: workspace,
        position: InsertPosition::End,
    });

    assert!(matches!(result, Err(TilingError::InvalidTopology(_))));
    assert_eq!(manager.snapshot(), before);
    assert!(sink.take().is_empty());
}

#[test]
fn test_unknown_handles_are_ignored() {
    let (mut manager, _sink) = start(TilingConfig::default());
    open(&mut manager, 1);
    let before = manager.snapshot();

    manager.ingest(Event::WindowClosed { handle: WindowHandle(42) });
    manager.ingest(Event::WindowMovedOrResized {
        handle: WindowHandle(42),
        rect: Rect::new(0.0, 0.0, 10.0, 10.0),
    });
    assert_eq!(manager.dispatch(Command::RemoveWindow { handle: WindowHandle(42) }), Ok(Outcome::NoOp));

    assert_eq!(manager.snapshot(), before);
}

struct Exploding;

impl EventSubscriber for Exploding {
    fn name(&self) -> &'static str { "exploding" }

    fn interests(&self) -> &'static [EventKind] { &[EventKind::WindowManaged] }

    fn on_event(&mut self, _event: &Event, _manager: &mut TilingManager) -> TilingResult<()> {
        panic!("subscriber blew up");
    }
}

#[test]
fn test_panicking_subscriber_does_not_stop_the_bus() {
    let (mut manager, _sink) = start(TilingConfig::default());
    manager.subscribe(Box::new(Exploding));

    open(&mut manager, 1);
    open(&mut manager, 2);

    assert_eq!(manager.containers().window_count(), 2);
    assert_eq!(shape(&manager), "root(monitor:primary(workspace:1[h](0x1 0x2)))");
}

#[test]
fn test_workspace_switch_hides_and_restores_windows() {
    let (mut manager, sink) = start(TilingConfig::default());
    open(&mut manager, 1);
    open(&mut manager, 2);
    manager.invoke(Command::MoveWindowToWorkspace { name: "2".to_string() }).unwrap();
    sink.take();

    manager.invoke(Command::FocusWorkspace { name: "2".to_string() }).unwrap();
    let effects = sink.take();

    assert!(effects.contains(&SideEffect::HideWindow { handle: WindowHandle(1) }));
    assert!(effects.contains(&SideEffect::ShowWindow { handle: WindowHandle(2) }));
    assert!(effects.contains(&SideEffect::SetForegroundWindow { handle: WindowHandle(2) }));

    manager.invoke(Command::ShowAllWindows).unwrap();
    assert_eq!(
        sink.take(),
        vec![
            SideEffect::ShowWindow { handle: WindowHandle(1) },
            SideEffect::ShowWindow { handle: WindowHandle(2) },
        ]
    );
}

#[test]
fn test_startup_without_monitors_restores_windows() {
    let sink = RecordingSink::new();
    let seed = WindowSeed {
        handle: WindowHandle(9),
        rect: Rect::new(0.0, 0.0, 100.0, 100.0),
        info: WindowInfo::default(),
    };

    let result = trellis_lib::tiling::build(
        TilingConfig::default(),
        Box::new(sink.clone()),
        Vec::new(),
        vec![seed],
    );

    assert!(matches!(result, Err(TilingError::FatalStartupFault(_))));
    assert_eq!(sink.take(), vec![SideEffect::ShowWindow { handle: WindowHandle(9) }]);
}

// ============================================================================
// Property: the tree stays valid under arbitrary input
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Open(u64),
    Close(u64),
    Move(Direction),
    Focus(Direction),
    Toggle,
    Resize(f64),
    FocusWorkspace(u8),
    SendToWorkspace(u8),
    Attach { window: usize, target: usize, at_end: bool },
    Swap(usize, usize),
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::Left),
        Just(Direction::Right),
        Just(Direction::Up),
        Just(Direction::Down),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (1u64..12).prop_map(Op::Open),
        2 => (1u64..12).prop_map(Op::Close),
        2 => direction().prop_map(Op::Move),
        1 => direction().prop_map(Op::Focus),
        1 => Just(Op::Toggle),
        1 => (-0.5f64..0.5).prop_map(Op::Resize),
        1 => (1u8..4).prop_map(Op::FocusWorkspace),
        1 => (1u8..4).prop_map(Op::SendToWorkspace),
        2 => (any::<usize>(), any::<usize>(), any::<bool>())
            .prop_map(|(window, target, at_end)| Op::Attach { window, target, at_end }),
        1 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Swap(a, b)),
    ]
}

/// Every window in the tree, and every workspace or split that can hold one.
fn attach_candidates(manager: &TilingManager) -> (Vec<ContainerId>, Vec<ContainerId>) {
    let tree = manager.containers().tree();
    let windows = tree.windows_under(tree.root());
    let parents = tree
        .descendants(tree.root())
        .into_iter()
        .filter(|&id| tree.get(id).is_some_and(|node| node.is_workspace() || node.is_split()))
        .collect();
    (windows, parents)
}

fn apply(manager: &mut TilingManager, op: Op) {
    match op {
        Op::Open(handle) => open(manager, handle),
        Op::Close(handle) => manager.ingest(Event::WindowClosed { handle: WindowHandle(handle) }),
        Op::Move(direction) => {
            let _ = manager.dispatch(Command::MoveFocusedWindow { direction });
        }
        Op::Focus(direction) => {
            let _ = manager.dispatch(Command::FocusInDirection { direction });
        }
        Op::Toggle => {
            let _ = manager.dispatch(Command::ToggleTilingDirection);
        }
        Op::Resize(amount) => {
            let _ = manager.dispatch(Command::ResizeFocusedWindow { amount });
        }
        Op::FocusWorkspace(n) => {
            let _ = manager.dispatch(Command::FocusWorkspace { name: n.to_string() });
        }
        Op::SendToWorkspace(n) => {
            let _ = manager.dispatch(Command::MoveWindowToWorkspace { name: n.to_string() });
        }
        Op::Attach { window, target, at_end } => {
            let (windows, parents) = attach_candidates(manager);
            if windows.is_empty() || parents.is_empty() {
                return;
            }
            let _ = manager.dispatch(Command::AttachContainer {
                parent: parents[target % parents.len()],
                child: windows[window % windows.len()],
                position: if at_end { InsertPosition::End } else { InsertPosition::Start },
            });
        }
        Op::Swap(a, b) => {
            let (windows, _) = attach_candidates(manager);
            if windows.len() < 2 {
                return;
            }
            let _ = manager.dispatch(Command::SwapContainers {
                a: windows[a % windows.len()],
                b: windows[b % windows.len()],
            });
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_tree_invariants_hold(
        ops in prop::collection::vec(op(), 1..60),
        alternate in any::<bool>(),
    ) {
        let config = TilingConfig {
            automatic_tiling_direction: if alternate {
                AutomaticTilingDirection::Alternate
            } else {
                AutomaticTilingDirection::Unchanged
            },
            ..Default::default()
        };
        let (mut manager, _sink) = start(config);

        for op in ops {
            apply(&mut manager, op);

            let service = manager.containers();
            let tree = service.tree();
            prop_assert!(tree.check_invariants().is_ok(), "{}", shape(&manager));

            // Every managed handle resolves to a window reachable from a workspace.
            for handle in service.managed_handles() {
                let window = service.window_by_handle(handle);
                prop_assert!(window.is_some_and(|id| tree.workspace_of(id).is_some()));
            }

            // Focus, when set, is a live window or an empty workspace.
            if let Some(focused) = service.focused_container() {
                let node = tree.get(focused);
                prop_assert!(
                    node.is_some_and(|node| {
                        node.is_window() || (node.is_workspace() && node.children().is_empty())
                    }),
                    "focus on {:?} in {}",
                    focused,
                    shape(&manager)
                );
            }
        }
    }
}
