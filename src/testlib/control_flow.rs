/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 控制流节点：条件分支与循环
 *
 * 循环的典型搭法：
 * ```ignore
 * let enter = enter(&mut g, init, "loop")?;
 * // NextIteration 尚未创建，先按名称占位
 * let merge = merge_with_names(&mut g, enter, &["next"])?;
 * let pred = less(&mut g, merge, limit)?;
 * let cond = loop_cond(&mut g, pred)?;
 * let sw = switch(&mut g, merge, cond)?;
 * let body = identity(&mut g, sw, 1)?;
 * let next = next_iteration(&mut g, "next", body)?;
 * g.add_edge(next, 0, merge, 1)?;
 * let out = exit(&mut g, sw)?;
 * ```
 */

use super::NAME_PREFIX;
use crate::graph::{Graph, GraphError, NodeBuilder, NodeId, NodeOut};

/// 按`pred`把`data`转发到`output_false`（第0个输出）或`output_true`（第1个输出）
pub fn switch(g: &mut Graph, data: NodeId, pred: NodeId) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("Switch")
        .input(data)
        .input(pred)
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 让`input`进入名为`frame_name`的循环帧
pub fn enter(g: &mut Graph, input: NodeId, frame_name: &str) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("Enter")
        .input(input)
        .attr("frame_name", frame_name)
        .finalize_with_new_name(g, NAME_PREFIX)
}

pub fn exit(g: &mut Graph, input: NodeId) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("Exit")
        .input(input)
        .finalize_with_new_name(g, NAME_PREFIX)
}

pub fn loop_cond(g: &mut Graph, input: NodeId) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("LoopCond")
        .input(input)
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 两个输入均已存在的`Merge`
pub fn merge(g: &mut Graph, a: NodeId, b: NodeId) -> Result<NodeId, GraphError> {
    NodeBuilder::anonymous("Merge")
        .input(a)
        .input(b)
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 第一个输入为`a`、其余输入只按名称引用的`Merge`
///
/// 按名称引用的输入均声明为`a`第0个输出的类型，之后用`Graph::add_edge`连接。
pub fn merge_with_names(g: &mut Graph, a: NodeId, remaining: &[&str]) -> Result<NodeId, GraphError> {
    let dtype = g.node(a)?.output_type(0)?;
    NodeBuilder::anonymous("Merge")
        .input(a)
        .inputs(remaining.iter().map(|&input| NodeOut::named(input, 0, dtype)))
        .finalize_with_new_name(g, NAME_PREFIX)
}

/// 名称由调用方指定，以便`merge_with_names`事先引用
pub fn next_iteration(g: &mut Graph, name: &str, input: NodeId) -> Result<NodeId, GraphError> {
    NodeBuilder::new(name, "NextIteration").input(input).finalize(g)
}
