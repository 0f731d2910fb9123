// Property-based tests for compiler invariants.
//
// Four categories:
// 1. Sanitizer: stability and digest-token shape
// 2. Port extraction: block order preserved per direction
// 3. Body: net declarations numbered in wire order
// 4. Whole compile: byte-identical output across runs
//
// Uses proptest with explicit configuration to prevent CI flakiness.

use icecc::body::build_body;
use icecc::pipeline::CompileOptions;
use icecc::ports::extract_ports;
use icecc::project::{Block, Graph, Ports, Project, Wire};
use icecc::sanitize::{sanitize, Sanitizer};
use icecc::verilog::compile_circuit_with;
use proptest::prelude::*;

// ── Generators ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
enum Kind {
    Input,
    Output,
    Not,
    Code,
}

fn arb_kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Input),
        Just(Kind::Output),
        Just(Kind::Not),
        Just(Kind::Code),
    ]
}

/// Blocks get unique ids `b<index>`, optionally with a hyphenated suffix.
fn arb_graph() -> impl Strategy<Value = Graph> {
    (
        prop::collection::vec((arb_kind(), prop::bool::ANY), 0..8),
        prop::collection::vec((any::<prop::sample::Index>(), any::<prop::sample::Index>()), 0..12),
    )
        .prop_map(|(kinds, wire_picks)| {
            let blocks: Vec<Block> = kinds
                .iter()
                .enumerate()
                .map(|(i, (kind, hyphen))| {
                    let id = if *hyphen {
                        format!("b{i}-x")
                    } else {
                        format!("b{i}")
                    };
                    match kind {
                        Kind::Input => Block::input(id).with_pin(format!("{i}")),
                        Kind::Output => Block::output(id).with_pin(format!("{i}")),
                        Kind::Not => Block::compound(id, "logic.not"),
                        Kind::Code => Block::code(id, Ports::default(), "assign y = 1'b1;"),
                    }
                })
                .collect();
            let wires = if blocks.is_empty() {
                Vec::new()
            } else {
                wire_picks
                    .iter()
                    .map(|(s, t)| {
                        let source = &blocks[s.index(blocks.len())];
                        let target = &blocks[t.index(blocks.len())];
                        Wire::new(source.id.clone(), "q", target.id.clone(), "a")
                    })
                    .collect()
            };
            Graph::new(blocks, wires)
        })
}

fn lenient() -> CompileOptions {
    CompileOptions {
        strict: false,
        ..CompileOptions::default()
    }
}

// ── 1. Sanitizer ────────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 200,
        .. ProptestConfig::default()
    })]

    #[test]
    fn sanitize_is_stable(name in ".{0,24}", force in prop::bool::ANY) {
        prop_assert_eq!(sanitize(&name, force), sanitize(&name, force));
    }

    #[test]
    fn sanitize_shape(name in "[a-z0-9_.-]{0,16}") {
        let out = sanitize(&name, false);
        if name.contains('-') {
            prop_assert_eq!(out.len(), 7);
            prop_assert!(out.starts_with('v'));
            prop_assert!(out[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        } else {
            prop_assert_eq!(&out, &name);
        }
        let forced = sanitize(&name, true);
        prop_assert_eq!(forced.len(), 7);
        prop_assert!(!forced.contains('-'));
    }
}

// ── 2-4. Graph properties ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 100,
        max_shrink_iters: 100,
        .. ProptestConfig::default()
    })]

    #[test]
    fn ports_follow_block_order(graph in arb_graph()) {
        let s = Sanitizer::default();
        let ports = extract_ports(&graph, &s);
        let expect_in: Vec<String> = graph
            .blocks
            .iter()
            .filter(|b| b.type_name() == "basic.input")
            .map(|b| s.sanitize(&b.id, false))
            .collect();
        let expect_out: Vec<String> = graph
            .blocks
            .iter()
            .filter(|b| b.type_name() == "basic.output")
            .map(|b| s.sanitize(&b.id, false))
            .collect();
        prop_assert_eq!(ports.inputs, expect_in);
        prop_assert_eq!(ports.outputs, expect_out);
    }

    #[test]
    fn nets_are_declared_in_wire_order(graph in arb_graph()) {
        let body = build_body("main", &graph, &Sanitizer::default());
        let mut last = None;
        for w in 0..graph.wires.len() {
            let decl = format!("wire w{w};\n");
            let pos = body.find(&decl);
            prop_assert!(pos.is_some(), "missing {}", decl);
            prop_assert!(last < pos, "{} out of order", decl);
            last = pos;
        }
        let next = format!("wire w{};", graph.wires.len());
        prop_assert!(!body.contains(&next));
    }

    #[test]
    fn compile_is_deterministic(graph in arb_graph()) {
        let project = Project::new(graph).with_dep("logic.not", Project::default());
        let first = compile_circuit_with("main", &project, &lenient()).unwrap();
        let second = compile_circuit_with("main", &project, &lenient()).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert!(first.trim().is_empty() || first.ends_with("endmodule\n"));
        let pins = icecc::compile_pins(&project).unwrap();
        prop_assert_eq!(pins, icecc::compile_pins(&project).unwrap());
    }
}

// ── Fixed examples ──────────────────────────────────────────────────────────

#[test]
fn port_order_example() {
    let graph = Graph::new(
        vec![Block::input("A"), Block::output("B"), Block::input("C")],
        vec![],
    );
    let ports = extract_ports(&graph, &Sanitizer::default());
    assert_eq!(ports.inputs, ["A", "C"]);
    assert_eq!(ports.outputs, ["B"]);
}

#[test]
fn instance_naming_example() {
    let project = Project::new(Graph::new(vec![Block::compound("my-gate", "basic.and")], vec![]))
        .with_dep("basic.and", Project::default());
    let verilog = compile_circuit_with("top", &project, &lenient()).unwrap();
    assert!(verilog.contains("\n top_v3e32df v6908e2 (\n"));
}
