use crate::assert_err;
use crate::graph::{AttrValue, Graph, GraphError, NodeBuilder, NodeId, NodeOut};
use crate::tensor::{DataType, SlotType, Tensor, TensorShape};

fn float_const(graph: &mut Graph, name: &str) -> NodeId {
    NodeBuilder::new(name, "Const")
        .attr("dtype", DataType::Float)
        .attr("value", Tensor::new(&[1.0, 2.0], &[2]))
        .finalize(graph)
        .unwrap()
}

fn int_const(graph: &mut Graph, name: &str) -> NodeId {
    NodeBuilder::new(name, "Const")
        .attr("dtype", DataType::Int32)
        .attr("value", Tensor::from_vec(vec![0i32], &[1]))
        .finalize(graph)
        .unwrap()
}

fn float_var(graph: &mut Graph, name: &str) -> NodeId {
    NodeBuilder::new(name, "Variable")
        .attr("dtype", DataType::Float)
        .attr("shape", TensorShape::new(&[2]))
        .finalize(graph)
        .unwrap()
}

#[test]
fn test_type_attr_inferred_from_inputs() {
    let mut graph = Graph::new();
    let a = float_const(&mut graph, "a");
    let b = float_const(&mut graph, "b");
    let mm = NodeBuilder::new("mm", "MatMul")
        .input(a)
        .input(b)
        .finalize(&mut graph)
        .unwrap();

    let node = graph.node(mm).unwrap();
    assert_eq!(node.attr("T"), Some(&AttrValue::Type(DataType::Float)));
    assert_eq!(node.output_types(), &[SlotType::value(DataType::Float)]);
    assert_eq!(node.input_types(), vec![SlotType::value(DataType::Float); 2]);
}

#[test]
fn test_defaults_filled() {
    let mut graph = Graph::new();
    let a = float_const(&mut graph, "a");
    let b = float_const(&mut graph, "b");
    let mm = NodeBuilder::new("mm", "MatMul")
        .input(a)
        .input(b)
        .finalize(&mut graph)
        .unwrap();

    let node = graph.node(mm).unwrap();
    assert_eq!(node.attr("transpose_a"), Some(&AttrValue::B(false)));
    assert_eq!(node.attr("transpose_b"), Some(&AttrValue::B(false)));

    let v = float_var(&mut graph, "v");
    let node = graph.node(v).unwrap();
    assert_eq!(node.attr("container"), Some(&AttrValue::S(String::new())));
    assert_eq!(node.attr("shared_name"), Some(&AttrValue::S(String::new())));
}

#[test]
fn test_inconsistent_input_types() {
    let mut graph = Graph::new();
    let a = float_const(&mut graph, "a");
    let i = int_const(&mut graph, "i");

    let result = NodeBuilder::new("bad_add", "Add")
        .input(a)
        .input(i)
        .finalize(&mut graph);
    assert_err!(
        result,
        GraphError::InconsistentAttr { attr, first, second, .. }
            if attr == "T" && first == "float" && second == "int32"
    );
    // 失败后图保持不变
    assert_eq!(graph.nodes_count(), 2);
    assert!(graph.node_id("bad_add").is_none());
    assert!(graph.get_node_children(a).unwrap().is_empty());
}

#[test]
fn test_preset_type_attr_must_match() {
    let mut graph = Graph::new();
    let a = float_const(&mut graph, "a");
    let result = NodeBuilder::new("id", "Identity")
        .input(a)
        .attr("T", DataType::Double)
        .finalize(&mut graph);
    assert_err!(result, GraphError::InconsistentAttr { attr, .. } if attr == "T");
}

#[test]
fn test_fixed_type_mismatch() {
    let mut graph = Graph::new();
    let a = float_const(&mut graph, "a");
    let b = float_const(&mut graph, "b");

    // reduction_indices 须为 int32
    let result = NodeBuilder::new("sum", "Sum")
        .input(a)
        .input(b)
        .finalize(&mut graph);
    assert_err!(result, GraphError::TypeMismatch("int32", "float"));
}

#[test]
fn test_ref_input_requires_ref_output() {
    let mut graph = Graph::new();
    let v = float_var(&mut graph, "v");
    let a = float_const(&mut graph, "a");

    let ok = NodeBuilder::new("assign", "Assign")
        .input(v)
        .input(a)
        .finalize(&mut graph)
        .unwrap();
    assert_eq!(
        graph.node(ok).unwrap().output_types(),
        &[SlotType::reference(DataType::Float)]
    );

    let result = NodeBuilder::new("bad_assign", "Assign")
        .input(a)
        .input(a)
        .finalize(&mut graph);
    assert_err!(result, GraphError::TypeMismatch("float_ref", "float"));
}

#[test]
fn test_input_count_mismatch() {
    let mut graph = Graph::new();
    let a = float_const(&mut graph, "a");
    let result = NodeBuilder::new("add", "Add").input(a).finalize(&mut graph);
    assert_err!(
        result,
        GraphError::InputCountMismatch { expected: 2, got: 1, .. }
    );

    // 列表输入至少需要1个
    let result = NodeBuilder::new("addn", "AddN").finalize(&mut graph);
    assert_err!(result, GraphError::InvalidArgument(_));
}

#[test]
fn test_list_input_sets_number_attr() {
    let mut graph = Graph::new();
    let a = float_const(&mut graph, "a");
    let b = float_const(&mut graph, "b");
    let c = float_const(&mut graph, "c");
    let sum = NodeBuilder::new("sum", "AddN")
        .inputs([a, b, c].map(NodeOut::from))
        .finalize(&mut graph)
        .unwrap();
    let node = graph.node(sum).unwrap();
    assert_eq!(node.attr("N"), Some(&AttrValue::I(3)));
    assert_eq!(node.num_inputs(), 3);

    // 预设的 N 与实际输入数量不符
    let result = NodeBuilder::new("sum2", "AddN")
        .input(a)
        .attr("N", 2i64)
        .finalize(&mut graph);
    assert_err!(result, GraphError::InconsistentAttr { attr, .. } if attr == "N");
}

#[test]
fn test_invalid_output_slot() {
    let mut graph = Graph::new();
    let a = float_const(&mut graph, "a");
    let result = NodeBuilder::new("id", "Identity")
        .input(NodeOut::new(a, 1))
        .finalize(&mut graph);
    assert_err!(result, GraphError::InvalidOutputSlot { slot: 1, .. });

    let result = NodeBuilder::new("id", "Identity")
        .input(NodeId(99))
        .finalize(&mut graph);
    assert_err!(result, GraphError::NodeNotFound(NodeId(99)));
}

#[test]
fn test_attr_errors() {
    let mut graph = Graph::new();
    let a = float_const(&mut graph, "a");

    // 未声明的属性
    let result = NodeBuilder::new("id", "Identity")
        .input(a)
        .attr("foo", 1i64)
        .finalize(&mut graph);
    assert_err!(result, GraphError::UnknownAttr { attr, op, .. } if attr == "foo" && op == "Identity");

    // 缺少无默认值的属性
    let result = NodeBuilder::new("enter", "Enter").input(a).finalize(&mut graph);
    assert_err!(result, GraphError::MissingAttr { attr, .. } if attr == "frame_name");

    // 属性种类不符
    let result = NodeBuilder::new("enter", "Enter")
        .input(a)
        .attr("frame_name", 3i64)
        .finalize(&mut graph);
    assert_err!(
        result,
        GraphError::AttrKindMismatch { expected: "string", got: "int", .. }
    );

    // 类型不在允许范围内
    let s = NodeBuilder::new("s", "Const")
        .attr("dtype", DataType::String)
        .attr("value", Tensor::from_vec(vec!["x".to_string()], &[1]))
        .finalize(&mut graph)
        .unwrap();
    let result = NodeBuilder::new("add", "Add").input(s).input(s).finalize(&mut graph);
    assert_err!(
        result,
        GraphError::DisallowedType { attr, dtype: DataType::String, .. } if attr == "T"
    );
}

#[test]
fn test_const_value_must_match_dtype() {
    let mut graph = Graph::new();
    let result = NodeBuilder::new("c", "Const")
        .attr("dtype", DataType::Int32)
        .attr("value", Tensor::new(&[1.0], &[1]))
        .finalize(&mut graph);
    assert_err!(result, GraphError::InvalidArgument(_));
    assert_eq!(graph.nodes_count(), 0);
}

#[test]
fn test_name_errors() {
    let mut graph = Graph::with_name("g");
    float_const(&mut graph, "a");

    let result = NodeBuilder::new("a", "NoOp").finalize(&mut graph);
    assert_err!(result, GraphError::DuplicateNodeName("节点a在图g中重复"));

    let result = NodeBuilder::new("", "NoOp").finalize(&mut graph);
    assert_err!(result, GraphError::InvalidArgument(_));

    let result = NodeBuilder::new("x", "Unknown").finalize(&mut graph);
    assert_err!(result, GraphError::OpNotRegistered(op) if op == "Unknown");
    assert_eq!(graph.nodes_count(), 1);
}

#[test]
fn test_reserved_characters_in_names() {
    let mut graph = Graph::with_name("g");
    let a = float_const(&mut graph, "a");

    // ":"与前导"^"在 GraphDef 输入项中有特殊含义
    for name in ["a:1", "^a", "x:y"] {
        let result = NodeBuilder::new(name, "Identity").input(a).finalize(&mut graph);
        assert_err!(result, GraphError::InvalidArgument(_));
    }
    let result = NodeBuilder::new("m", "Merge")
        .input(a)
        .input(NodeOut::named("next:0", 0, DataType::Float))
        .finalize(&mut graph);
    assert_err!(result, GraphError::InvalidArgument(_));
    assert_eq!(graph.nodes_count(), 1);

    // 其它字符不受限制
    let id = NodeBuilder::new("scope/a_b.c-1^", "Identity")
        .input(a)
        .finalize(&mut graph)
        .unwrap();
    assert_eq!(graph.get_node_name(id).unwrap(), "scope/a_b.c-1^");
}

#[test]
fn test_finalize_with_new_name() {
    let mut graph = Graph::with_name("g");
    let a = float_const(&mut graph, "a");

    let id = NodeBuilder::anonymous("Identity")
        .input(a)
        .finalize_with_new_name(&mut graph, "n")
        .unwrap();
    assert_eq!(graph.get_node_name(id).unwrap(), "n/_0");

    // 失败时名称计数器一并回退
    let result = NodeBuilder::anonymous("Identity")
        .input(NodeOut::new(a, 5))
        .finalize_with_new_name(&mut graph, "n");
    assert_err!(result, GraphError::InvalidOutputSlot { slot: 5, .. });
    assert_eq!(graph.new_name("n"), "n/_1");

    // 未命名的节点不能直接注册
    let result = NodeBuilder::anonymous("NoOp").finalize(&mut graph);
    assert_err!(result, GraphError::InvalidArgument(_));
    assert_eq!(graph.nodes_count(), 2);
}

#[test]
fn test_control_inputs_deduplicated() {
    let mut graph = Graph::new();
    let a = float_const(&mut graph, "a");
    let b = float_const(&mut graph, "b");
    let noop = NodeBuilder::new("noop", "NoOp")
        .control_inputs(&[a, b, a])
        .finalize(&mut graph)
        .unwrap();
    assert_eq!(graph.node(noop).unwrap().control_inputs(), &[a, b]);

    let result = NodeBuilder::new("noop2", "NoOp")
        .control_input(NodeId(7))
        .finalize(&mut graph);
    assert_err!(result, GraphError::NodeNotFound(NodeId(7)));
}

#[test]
fn test_node_spec() {
    let builder = NodeBuilder::new("x", "Identity").attr("T", DataType::Float);
    assert_eq!(builder.spec().name, "x");
    assert_eq!(builder.spec().op, "Identity");
    let spec = builder.into_spec();
    assert_eq!(spec.attrs.get("T"), Some(&AttrValue::Type(DataType::Float)));
    assert!(spec.inputs.is_empty());
}
