use crate::assert_err;
use crate::graph::{AttrValue, Graph, GraphError, NodeId};
use crate::tensor::{DataType, SlotType, Tensor};
use crate::testlib::{self, RandomKind};
use approx::assert_abs_diff_eq;

fn matrix(g: &mut Graph) -> NodeId {
    testlib::constant(g, &Tensor::new(&[1.0, 2.0, 3.0, 4.0], &[2, 2])).unwrap()
}

fn random_matrix(g: &mut Graph) -> NodeId {
    testlib::constant(g, &Tensor::new_random(-1.0, 1.0, &[2, 2])).unwrap()
}

fn axes(g: &mut Graph) -> NodeId {
    testlib::constant(g, &Tensor::from_vec(vec![0i32], &[1])).unwrap()
}

#[test]
fn test_reduce() {
    let mut g = Graph::new();
    let data = matrix(&mut g);
    let ax = axes(&mut g);

    let sum = testlib::reduce(&mut g, "Sum", data, ax, true).unwrap();
    let node = g.node(sum).unwrap();
    assert_eq!(node.op(), "Sum");
    assert_eq!(node.attr("keep_dims"), Some(&AttrValue::B(true)));
    assert_eq!(node.attr("T"), Some(&AttrValue::Type(DataType::Float)));
    assert_eq!(node.output_types(), &[SlotType::value(DataType::Float)]);

    // 布尔归约
    let flags = testlib::constant(&mut g, &Tensor::from_vec(vec![true, false], &[2])).unwrap();
    let all = testlib::reduce(&mut g, "All", flags, ax, false).unwrap();
    assert_eq!(g.node(all).unwrap().output_types(), &[SlotType::value(DataType::Bool)]);

    // 轴须为int32
    assert_err!(
        testlib::reduce(&mut g, "Max", data, data, false),
        GraphError::TypeMismatch("int32", "float")
    );
    assert_err!(
        testlib::reduce(&mut g, "Median", data, ax, false),
        GraphError::OpNotRegistered(op) if op == "Median"
    );
}

#[test]
fn test_quantize_to_uint8() {
    let mut g = Graph::new();
    let data = matrix(&mut g);
    let q = testlib::quantize_to_uint8(&mut g, data).unwrap();

    let node = g.node(q).unwrap();
    assert_eq!(node.op(), "Quantize");
    assert_eq!(node.attr("T"), Some(&AttrValue::Type(DataType::QUInt8)));
    assert_eq!(node.output_types(), &[SlotType::value(DataType::QUInt8)]);
    assert_abs_diff_eq!(node.attr("min_range").and_then(AttrValue::as_float).unwrap(), -1.0);
    assert_abs_diff_eq!(node.attr("max_range").and_then(AttrValue::as_float).unwrap(), 1.0);

    let ints = axes(&mut g);
    assert_err!(
        testlib::quantize_to_uint8(&mut g, ints),
        GraphError::TypeMismatch("float", "int32")
    );
}

#[test]
fn test_matmul() {
    let mut g = Graph::new();
    let a = random_matrix(&mut g);
    let b = random_matrix(&mut g);
    let mm = testlib::matmul(&mut g, a, b, true, false).unwrap();

    let weights = g.node(a).unwrap().attr("value").and_then(AttrValue::as_tensor).unwrap();
    assert_eq!(weights.shape(), &[2, 2]);
    assert!(weights.to_vec::<f32>().unwrap().iter().all(|v| (-1.0..=1.0).contains(v)));

    let node = g.node(mm).unwrap();
    assert_eq!(node.op(), "MatMul");
    assert_eq!(node.attr("transpose_a"), Some(&AttrValue::B(true)));
    assert_eq!(node.attr("transpose_b"), Some(&AttrValue::B(false)));
    assert_eq!(node.attr("T"), Some(&AttrValue::Type(DataType::Float)));

    // int64 不在 MatMul 允许的类型中
    let i = testlib::constant(&mut g, &Tensor::from_vec(vec![1i64, 2, 3, 4], &[2, 2])).unwrap();
    assert_err!(
        testlib::matmul(&mut g, i, i, false, false),
        GraphError::DisallowedType { dtype: DataType::Int64, .. }
    );
}

#[test]
fn test_random_number_generator() {
    let cases = [
        (RandomKind::Uniform, "RandomUniform"),
        (RandomKind::Gaussian, "RandomStandardNormal"),
        (RandomKind::Parameters, "RandomParameters"),
    ];
    for (kind, op) in cases {
        assert_eq!(kind.op(), op);

        let mut g = Graph::new();
        let shape = testlib::constant(&mut g, &Tensor::from_vec(vec![2i32, 3], &[2])).unwrap();
        let r = testlib::random_number_generator(&mut g, kind, shape, DataType::Double).unwrap();

        let node = g.node(r).unwrap();
        assert_eq!(node.op(), op);
        assert_eq!(node.attr("seed"), Some(&AttrValue::I(0)));
        assert_eq!(node.attr("seed2"), Some(&AttrValue::I(0)));
        assert_eq!(node.attr("T"), Some(&AttrValue::Type(DataType::Int32)));
        assert_eq!(node.output_types(), &[SlotType::value(DataType::Double)]);
    }
}

#[test]
fn test_random_wrappers() {
    let mut g = Graph::new();
    let shape = testlib::constant(&mut g, &Tensor::from_vec(vec![4i64], &[1])).unwrap();

    let u = testlib::random_uniform(&mut g, shape, DataType::Float).unwrap();
    let n = testlib::random_gaussian(&mut g, shape, DataType::Float).unwrap();
    let p = testlib::random_parameters(&mut g, shape, DataType::Float).unwrap();
    assert_eq!(g.node(u).unwrap().op(), "RandomUniform");
    assert_eq!(g.node(n).unwrap().op(), "RandomStandardNormal");
    assert_eq!(g.node(p).unwrap().op(), "RandomParameters");

    // 只支持浮点输出
    assert_err!(
        testlib::random_uniform(&mut g, shape, DataType::Int32),
        GraphError::DisallowedType { attr, .. } if attr == "dtype"
    );
}

#[test]
fn test_unary_binary_multi() {
    let mut g = Graph::new();
    let a = matrix(&mut g);
    let b = matrix(&mut g);

    let neg = testlib::unary(&mut g, "Neg", a, 0).unwrap();
    assert_eq!(g.node(neg).unwrap().op(), "Neg");

    let max = testlib::binary(&mut g, "Maximum", a, b).unwrap();
    assert_eq!(g.node(max).unwrap().num_inputs(), 2);

    let sum = testlib::multi(&mut g, "AddN", &[a, b, neg, max]).unwrap();
    let node = g.node(sum).unwrap();
    assert_eq!(node.op(), "AddN");
    assert_eq!(node.num_inputs(), 4);
    assert_eq!(node.attr("N"), Some(&AttrValue::I(4)));

    assert_err!(
        testlib::multi(&mut g, "AddN", &[]),
        GraphError::InvalidArgument(_)
    );
}

#[test]
fn test_named_binary_wrappers() {
    let mut g = Graph::new();
    let a = matrix(&mut g);
    let b = matrix(&mut g);

    let cases: [(fn(&mut Graph, NodeId, NodeId) -> Result<NodeId, GraphError>, &str, DataType); 6] = [
        (testlib::add, "Add", DataType::Float),
        (testlib::sub, "Sub", DataType::Float),
        (testlib::mul, "Mul", DataType::Float),
        (testlib::div, "Div", DataType::Float),
        (testlib::less, "Less", DataType::Bool),
        (testlib::greater, "Greater", DataType::Bool),
    ];
    for (build, op, out) in cases {
        let id = build(&mut g, a, b).unwrap();
        let node = g.node(id).unwrap();
        assert_eq!(node.op(), op);
        assert_eq!(node.attr("T"), Some(&AttrValue::Type(DataType::Float)));
        assert_eq!(node.output_types(), &[SlotType::value(out)]);
    }

    let flag = testlib::constant(&mut g, &Tensor::scalar(true)).unwrap();
    assert_err!(
        testlib::less(&mut g, flag, flag),
        GraphError::DisallowedType { dtype: DataType::Bool, .. }
    );
}

#[test]
fn test_select() {
    let mut g = Graph::new();
    let cond = testlib::constant(&mut g, &Tensor::from_vec(vec![true, false, true, false], &[2, 2])).unwrap();
    let x = matrix(&mut g);
    let y = matrix(&mut g);

    let s = testlib::select(&mut g, cond, x, y).unwrap();
    let node = g.node(s).unwrap();
    assert_eq!(node.op(), "Select");
    assert_eq!(node.output_types(), &[SlotType::value(DataType::Float)]);

    assert_err!(
        testlib::select(&mut g, x, x, y),
        GraphError::TypeMismatch("bool", "float")
    );
}

#[test]
fn test_cast() {
    let mut g = Graph::new();
    let x = matrix(&mut g);
    let c = testlib::cast(&mut g, x, DataType::Int64).unwrap();

    let node = g.node(c).unwrap();
    assert_eq!(node.op(), "Cast");
    assert_eq!(node.attr("SrcT"), Some(&AttrValue::Type(DataType::Float)));
    assert_eq!(node.attr("DstT"), Some(&AttrValue::Type(DataType::Int64)));
    assert_eq!(node.output_types(), &[SlotType::value(DataType::Int64)]);
}
