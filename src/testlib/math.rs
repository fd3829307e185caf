/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 数学运算节点：归约、量化、矩阵乘、随机数、一元/二元/多元运算、选择与类型转换
 */

use super::NAME_PREFIX;
use crate::graph::{Graph, GraphError, NodeBuilder, NodeId, NodeOut};
use crate::tensor::DataType;

/// 按算子名`reduce_op`（如`Sum`、`Max`、`All`）沿`axes`归约`data`
pub fn reduce(
    g: &mut Graph,
    reduce_op: &str,
    data: NodeId,
    axes: NodeId,
    keep_dims: bool,
) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous(reduce_op)
        .input(data)
        .input(axes)
        .attr("keep_dims", keep_dims)
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 把`[-1.0, 1.0]`范围内的float量化为quint8
pub fn quantize_to_uint8(g: &mut Graph, data: NodeId) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("Quantize")
        .input(data)
        .attr("T", DataType::QUInt8)
        .attr("min_range", -1.0f32)
        .attr("max_range", 1.0f32)
        .finalize_with_new_name(g, NAME_PREFIX)
}

pub fn matmul(
    g: &mut Graph,
    a: NodeId,
    b: NodeId,
    transpose_a: bool,
    transpose_b: bool,
) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("MatMul")
        .input(a)
        .input(b)
        .attr("transpose_a", transpose_a)
        .attr("transpose_b", transpose_b)
        .finalize_with_new_name(g, NAME_PREFIX)
}

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓随机数↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 随机数节点的分布
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomKind {
    Uniform,
    Gaussian,
    /// 按参数采样
    Parameters,
}

impl RandomKind {
    pub const fn op(self) -> &'static str {
        match self {
            Self::Uniform => "RandomUniform",
            Self::Gaussian => "RandomStandardNormal",
            Self::Parameters => "RandomParameters",
        }
    }
}

/// 以`input`为形状生成`dtype`类型的随机张量，种子固定为0
pub fn random_number_generator(
    g: &mut Graph,
    kind: RandomKind,
    input: NodeId,
    dtype: DataType,
) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous(kind.op())
        .input(input)
        .attr("dtype", dtype)
        .attr("seed", 0i64)
        .finalize_with_new_name(g, NAME_PREFIX)
}

pub fn random_uniform(g: &mut Graph, input: NodeId, dtype: DataType) -> Result<NodeId, GraphError> {
    random_number_generator(g, RandomKind::Uniform, input, dtype)
}

pub fn random_gaussian(g: &mut Graph, input: NodeId, dtype: DataType) -> Result<NodeId, GraphError> {
    random_number_generator(g, RandomKind::Gaussian, input, dtype)
}

pub fn random_parameters(g: &mut Graph, input: NodeId, dtype: DataType) -> Result<NodeId, GraphError> {
    random_number_generator(g, RandomKind::Parameters, input, dtype)
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑随机数↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓通用运算↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 以`input`的第`index`个输出为输入的一元运算`func`
pub fn unary(g: &mut Graph, func: &str, input: NodeId, index: usize) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous(func)
        .input(NodeOut::new(input, index))
        .finalize_with_new_name(g, NAME_PREFIX)
}

pub fn binary(g: &mut Graph, func: &str, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous(func)
        .input(a)
        .input(b)
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 任意个输入的运算`func`（如`AddN`）
pub fn multi(g: &mut Graph, func: &str, inputs: &[NodeId]) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous(func)
        .inputs(inputs.iter().map(|&id| NodeOut::from(id)))
        .finalize_with_new_name(g, NAME_PREFIX)
}

// 具名的二元运算：函数名为算子名的snake_case形式
macro_rules! binary_wrappers {
    ($($op:ident),* $(,)?) => {
        paste::paste! {
            $(
                #[doc = concat!("二元运算`", stringify!($op), "`")]
                pub fn [<$op:snake>](g: &mut Graph, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
                    binary(g, stringify!($op), a, b)
                }
            )*
        }
    };
}

binary_wrappers!(Add, Sub, Mul, Div, Less, Greater);
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑通用运算↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/// `cond`为真处取`x`，否则取`y`
pub fn select(g: &mut Graph, cond: NodeId, x: NodeId, y: NodeId) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("Select")
        .input(cond)
        .input(x)
        .input(y)
        .finalize_with_new_name(g, NAME_PREFIX)
}

pub fn cast(g: &mut Graph, input: NodeId, dst: DataType) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("Cast")
        .input(input)
        .attr("DstT", dst)
        .finalize_with_new_name(g, NAME_PREFIX)
}
