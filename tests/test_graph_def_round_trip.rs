/*
 * @Author       : 老董
 * @Date         : 2026-10-16
 * @Description  : 端到端测试：用 testlib 搭建含收发、变量、循环、非有限常量的图片段，
 *                 导出为 GraphDef，经 JSON / 二进制 / 文件往返后重建，结果应与原图一致
 */
use graph_testlib::graph::{Graph, GraphDef, GraphError};
use graph_testlib::tensor::{DataType, Tensor, TensorShape};
use graph_testlib::testlib;
use std::time::Duration;

/// 一个"接收 -> 循环累加 -> 发送"的片段
fn build_fragment() -> Result<Graph, GraphError> {
    let mut g = Graph::with_name("worker");

    let input = testlib::recv(&mut g, "x", "float", "/job:ps/cpu:0", 1, "/job:worker/cpu:0")?;
    let one = testlib::constant_named(&mut g, &Tensor::new(&[1.0], &[]), "one")?;
    let limit = testlib::constant_named(&mut g, &Tensor::new(&[5.0], &[]), "limit")?;
    let bounds = Tensor::new(&[f32::NEG_INFINITY, f32::INFINITY], &[2]);
    testlib::constant_named(&mut g, &bounds, "bounds")?;
    let counter = testlib::var(&mut g, DataType::Float, &TensorShape::scalar())?;
    let init = testlib::assign(&mut g, counter, input)?;

    let enter = testlib::enter(&mut g, input, "accumulate")?;
    let merge = testlib::merge_with_names(&mut g, enter, &["accumulate/next"])?;
    let pred = testlib::less(&mut g, merge, limit)?;
    let cond = testlib::loop_cond(&mut g, pred)?;
    let switch = testlib::switch(&mut g, merge, cond)?;
    let body = testlib::identity(&mut g, switch, 1)?;
    let step = testlib::add(&mut g, body, one)?;
    let slow = testlib::delay(&mut g, step, Duration::from_micros(250))?;
    let next = testlib::next_iteration(&mut g, "accumulate/next", slow)?;
    g.add_edge(next, 0, merge, 1)?;
    let exit = testlib::exit(&mut g, switch)?;

    let result = testlib::cast(&mut g, exit, DataType::Double)?;
    testlib::send(&mut g, result, "y", "/job:worker/cpu:0", 1, "/job:ps/cpu:0")?;
    testlib::no_op(&mut g, &[init, exit])?;
    Ok(g)
}

#[test]
fn test_fragment_structure() {
    let g = build_fragment().unwrap();
    let graph_def = testlib::to_graph_def(&g).unwrap();

    assert_eq!(graph_def.name, "worker");
    assert_eq!(graph_def.node.len(), g.nodes_count());
    let ops: Vec<&str> = graph_def.node.iter().map(|n| n.op.as_str()).collect();
    for op in [
        "_Recv", "Const", "Variable", "Assign", "Enter", "Merge", "Less", "LoopCond", "Switch",
        "Identity", "Add", "Delay", "NextIteration", "Exit", "Cast", "_Send", "NoOp",
    ] {
        assert!(ops.contains(&op), "缺少算子{op}");
    }
    assert!(g.nodes().iter().all(|&id| !g.node(id).unwrap().has_pending_inputs()));
}

#[test]
fn test_rebuild_from_graph_def() {
    let g = build_fragment().unwrap();
    let graph_def = g.to_graph_def().unwrap();

    let rebuilt = Graph::from_graph_def(&graph_def).unwrap();
    assert_eq!(rebuilt.to_graph_def().unwrap(), graph_def);
    assert_eq!(rebuilt.to_dot(), g.to_dot());
}

#[test]
fn test_serialized_round_trips() {
    let graph_def = build_fragment().unwrap().to_graph_def().unwrap();

    let from_json = GraphDef::from_json(&graph_def.to_json().unwrap()).unwrap();
    assert_eq!(from_json, graph_def);

    let from_bytes = GraphDef::from_bytes(&graph_def.to_bytes().unwrap()).unwrap();
    assert_eq!(from_bytes, graph_def);

    let rebuilt = Graph::from_graph_def(&from_bytes).unwrap();
    assert_eq!(rebuilt.to_graph_def().unwrap(), graph_def);
}

#[test]
fn test_file_round_trip() {
    let g = build_fragment().unwrap();
    let path = std::env::temp_dir().join(format!("graph_testlib_worker_{}.json", std::process::id()));

    g.save_graph_def(&path).unwrap();
    let loaded = Graph::load_graph_def(&path).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.to_graph_def().unwrap(), g.to_graph_def().unwrap());
    assert_eq!(loaded.node_by_name("one").unwrap().op(), "Const");

    let bounds = loaded
        .node_by_name("bounds")
        .unwrap()
        .attr("value")
        .and_then(|value| value.as_tensor())
        .unwrap();
    assert_eq!(bounds.to_vec::<f32>().unwrap(), vec![f32::NEG_INFINITY, f32::INFINITY]);
}
