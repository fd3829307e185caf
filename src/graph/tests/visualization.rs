use super::descriptor::build_loop_graph;
use crate::graph::{Graph, NodeBuilder, NodeOut};
use crate::tensor::{DataType, Tensor};
use crate::testlib;

#[test]
fn test_to_dot_contains_all_nodes_and_edges() {
    let g = build_loop_graph();
    let dot = g.to_dot();

    assert!(dot.starts_with("digraph \"loop_graph\" {\n"));
    assert!(dot.contains("rankdir=TB;"));
    assert!(dot.trim_end().ends_with('}'));

    // 每个节点一行
    for id in g.nodes() {
        let node = g.node(id).unwrap();
        let label = format!("label=\"{}\\n{}\"", node.name(), node.op());
        assert!(dot.contains(&label), "缺少节点{}", node.name());
    }

    // 数据边（Switch 的第1个输出标注槽位）
    assert!(dot.contains("\"n/_6\" -> \"n/_7\" [label=\"1\"];"));
    assert!(dot.contains("\"init\" -> \"n/_2\";"));
    // 控制边
    assert!(dot.contains("\"n/_8\" -> \"n/_9\" [style=dashed];"));
    // 回边已连接，不再有占位节点
    assert!(!dot.contains("pending:"));
}

#[test]
fn test_to_dot_pending_input() {
    let mut g = Graph::new();
    let c = testlib::constant(&mut g, &Tensor::new(&[1.0], &[1])).unwrap();
    NodeBuilder::new("merge", "Merge")
        .input(c)
        .input(NodeOut::named("later", 0, DataType::Float))
        .finalize(&mut g)
        .unwrap();

    let dot = g.to_dot();
    assert!(dot.contains("\"pending:later\" [label=\"later\\n(未连接)\""));
    assert!(dot.contains("\"pending:later\" -> \"merge\" [style=dotted];"));
    // Merge 使用控制流节点样式
    assert!(dot.contains("\"merge\" [label=\"merge\\nMerge\", shape=diamond"));
}

#[test]
fn test_to_dot_escapes_quotes() {
    let mut g = Graph::with_name("say \"hi\"");
    testlib::constant_named(&mut g, &Tensor::new(&[1.0], &[1]), "a\"b").unwrap();

    let dot = g.to_dot();
    assert!(dot.starts_with("digraph \"say \\\"hi\\\"\" {"));
    assert!(dot.contains("\"a\\\"b\" [label=\"a\\\"b\\nConst\""));
}
