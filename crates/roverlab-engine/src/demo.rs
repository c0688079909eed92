//! Bundled demo programs: one authored flow graph per catalog mission,
//! used by the headless runner to exercise the full
//! graph-to-completion pipeline.

use roverlab_types::{
    ActionData, FlowEdge, FlowGraph, FlowNode, FlowNodeKind, LoopData, HANDLE_BODY, HANDLE_NEXT,
};

/// The bundled solution graph for a catalog mission, if one exists.
pub fn demo_graph(mission_id: &str) -> Option<FlowGraph> {
    match mission_id {
        "mission_1_1" => Some(loop_forward(4)),
        "mission_1_2" => Some(loop_forward(8)),
        "mission_1_3" => Some(chain(vec![
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::PickUp,
            ActionData::TurnLeft,
            ActionData::TurnLeft,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::TurnLeft,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::PutDown,
        ])),
        // Two steps up to the gate, wait out its opening delay, then
        // drive through before it closes.
        "mission_2_1" => Some(chain(vec![
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::Wait { seconds: 3.0 },
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
        ])),
        "mission_2_2" => Some(chain(vec![
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::Log {
                message: "survey report".to_owned(),
            },
            ActionData::TurnRight,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::Log {
                message: "survey report".to_owned(),
            },
            ActionData::TurnRight,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::MoveForward,
            ActionData::Log {
                message: "survey report".to_owned(),
            },
        ])),
        _ => None,
    }
}

/// start -> a1 -> ... -> an -> end, all plain edges.
fn chain(actions: Vec<ActionData>) -> FlowGraph {
    let mut nodes = vec![FlowNode {
        id: "start".to_owned(),
        kind: FlowNodeKind::Start,
    }];
    let mut edges = Vec::new();
    let mut previous = "start".to_owned();
    for (i, action) in actions.into_iter().enumerate() {
        let id = format!("a{i}");
        nodes.push(FlowNode {
            id: id.clone(),
            kind: FlowNodeKind::Action { action },
        });
        edges.push(FlowEdge::plain(format!("e{i}"), previous.clone(), id.clone()));
        previous = id;
    }
    nodes.push(FlowNode {
        id: "end".to_owned(),
        kind: FlowNodeKind::End,
    });
    edges.push(FlowEdge::plain("e_end", previous, "end"));
    FlowGraph { nodes, edges }
}

/// start -> repeat(count){ move forward } -> end.
fn loop_forward(count: u32) -> FlowGraph {
    FlowGraph {
        nodes: vec![
            FlowNode {
                id: "start".to_owned(),
                kind: FlowNodeKind::Start,
            },
            FlowNode {
                id: "loop".to_owned(),
                kind: FlowNodeKind::Loop {
                    data: LoopData::Repeat { count },
                },
            },
            FlowNode {
                id: "step".to_owned(),
                kind: FlowNodeKind::Action {
                    action: ActionData::MoveForward,
                },
            },
            FlowNode {
                id: "end".to_owned(),
                kind: FlowNodeKind::End,
            },
        ],
        edges: vec![
            FlowEdge::plain("e1", "start", "loop"),
            FlowEdge::with_handle("e2", "loop", "step", HANDLE_BODY),
            FlowEdge::with_handle("e3", "loop", "end", HANDLE_NEXT),
        ],
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use roverlab_flow::{validate_graph, GraphConverter};
    use roverlab_missions::all_missions;

    use super::*;

    #[test]
    fn every_catalog_mission_has_a_valid_demo() {
        for mission in all_missions() {
            let graph = demo_graph(&mission.id)
                .unwrap_or_else(|| panic!("no demo for {}", mission.id));
            let validation = validate_graph(&graph);
            assert!(
                validation.is_valid(),
                "demo for {} invalid: {:?}",
                mission.id,
                validation.errors
            );
            let program = GraphConverter::new(&graph).convert().unwrap();
            assert!(!program.is_empty());
        }
    }

    #[test]
    fn loop_demo_converts_to_a_repeat() {
        use roverlab_types::InstructionKind;

        let graph = demo_graph("mission_1_1").unwrap();
        let program = GraphConverter::new(&graph).convert().unwrap();
        assert!(matches!(
            program[0].kind,
            InstructionKind::Repeat { count: 4, .. }
        ));
    }
}
