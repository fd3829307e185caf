/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 基础节点：跨设备收发、常量、变量与赋值、测试专用算子、导出
 */

use super::NAME_PREFIX;
use crate::graph::{Graph, GraphDef, GraphError, NodeBuilder, NodeId, NodeOut};
use crate::tensor::{DataType, Tensor, TensorShape};
use std::time::Duration;

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓跨设备收发↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 把`input`的第0个输出以键`tensor`从`sender`发往`receiver`
pub fn send(
    g: &mut Graph,
    input: NodeId,
    tensor: &str,
    sender: &str,
    sender_incarnation: u64,
    receiver: &str,
) -> Result<NodeId, GraphError> {
    let incarnation = incarnation_attr(sender_incarnation)?;
    NodeBuilder::anonymous("_Send")
        .input(NodeOut::new(input, 0))
        .attr("tensor_name", tensor)
        .attr("send_device", sender)
        .attr("send_device_incarnation", incarnation)
        .attr("recv_device", receiver)
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 接收键为`tensor`的张量；`type_name`为元素类型名（如`"float"`），无法识别时不注册任何节点
pub fn recv(
    g: &mut Graph,
    tensor: &str,
    type_name: &str,
    sender: &str,
    sender_incarnation: u64,
    receiver: &str,
) -> Result<NodeId, GraphError> {
    let dtype: DataType = type_name
        .parse()
        .map_err(|_| GraphError::UnknownDataType(type_name.to_string()))?;
    let incarnation = incarnation_attr(sender_incarnation)?;
    NodeBuilder::anonymous("_Recv")
        .attr("tensor_type", dtype)
        .attr("tensor_name", tensor)
        .attr("send_device", sender)
        .attr("send_device_incarnation", incarnation)
        .attr("recv_device", receiver)
        .finalize_with_new_name(g, NAME_PREFIX)
}

fn incarnation_attr(incarnation: u64) -> Result<i64, GraphError> {
    i64::try_from(incarnation)
        .map_err(|_| GraphError::InvalidArgument(format!("设备代号{incarnation}超出int范围")))
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑跨设备收发↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓常量与变量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 常量节点，`dtype`取自张量本身
pub fn constant(g: &mut Graph, tensor: &Tensor) -> Result<NodeId, GraphError> {
    with_value(NodeBuilder::anonymous("Const"), tensor).finalize_with_new_name(g, NAME_PREFIX)
}

/// 指定名称的常量节点；名称已被占用时返回`DuplicateNodeName`
pub fn constant_named(g: &mut Graph, tensor: &Tensor, name: &str) -> Result<NodeId, GraphError> {
    with_value(NodeBuilder::new(name, "Const"), tensor).finalize(g)
}

fn with_value(builder: NodeBuilder, tensor: &Tensor) -> NodeBuilder {
    builder.attr("dtype", tensor.dtype()).attr("value", tensor)
}

pub fn var(g: &mut Graph, dtype: DataType, shape: &TensorShape) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("Variable")
        .attr("dtype", dtype)
        .attr("shape", shape)
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 把`val`赋给变量`var`（`var`须输出引用类型）
pub fn assign(g: &mut Graph, var: NodeId, val: NodeId) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("Assign")
        .input(var)
        .input(val)
        .attr("use_locking", true)
        .finalize_with_new_name(g, NAME_PREFIX)
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑常量与变量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

/*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓测试专用算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
/// 取`input`的第`index`个输出
pub fn identity(g: &mut Graph, input: NodeId, index: usize) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("Identity")
        .input(NodeOut::new(input, index))
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 执行时以`errmsg`报错的节点
pub fn error(g: &mut Graph, input: NodeId, errmsg: &str) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("Error")
        .input(input)
        .attr("message", errmsg)
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 声明类型为`out_type`、实际输出`invalid_type`引用的节点，两者必须不同
pub fn invalid_ref_type(
    g: &mut Graph,
    out_type: DataType,
    invalid_type: DataType,
) -> Result<NodeId, GraphError> {
    if out_type == invalid_type {
        return Err(GraphError::InvalidArgument(format!(
            "InvalidRefType的两个类型必须不同，实际均为{out_type}"
        )));
    }
    NodeBuilder::anonymous("InvalidRefType")
        .attr("TIn", out_type)
        .attr("TOut", invalid_type)
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 原样输出`input`，但延迟`delay`（按微秒记录）
pub fn delay(g: &mut Graph, input: NodeId, delay: Duration) -> Result<NodeId, GraphError> {
    let micros = i64::try_from(delay.as_micros())
        .map_err(|_| GraphError::InvalidArgument(format!("延迟{delay:?}超出int范围")))?;
    NodeBuilder::anonymous("Delay")
        .input(input)
        .attr("micros", micros)
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 只有控制输入的空节点
pub fn no_op(g: &mut Graph, control_inputs: &[NodeId]) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("NoOp")
        .control_inputs(control_inputs)
        .finalize_with_new_name(g, NAME_PREFIX)
}
/*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑测试专用算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

pub fn to_graph_def(g: &Graph) -> Result<GraphDef, GraphError> {
    g.to_graph_def()
}
