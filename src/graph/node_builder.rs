/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : NodeBuilder：以链式调用描述一个待注册的节点
 */

use super::attr::AttrValue;
use super::error::GraphError;
use super::inner::Graph;
use super::types::{NodeId, NodeOut};
use std::collections::BTreeMap;

/// 待注册节点的完整描述（注册前的临时对象，不会被保存）
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub name: String,
    pub op: String,
    pub inputs: Vec<NodeOut>,
    pub control_inputs: Vec<NodeId>,
    pub attrs: BTreeMap<String, AttrValue>,
}

/// # 示例
/// ```ignore
/// let id = NodeBuilder::new("mm", "MatMul")
///     .input(a)
///     .input(b)
///     .attr("transpose_a", true)
///     .finalize(&mut graph)?;
///
/// // 由图自动分配名称`n/_k`
/// let id = NodeBuilder::anonymous("Identity")
///     .input(id)
///     .finalize_with_new_name(&mut graph, "n")?;
/// ```
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    spec: NodeSpec,
}

impl NodeBuilder {
    pub fn new(name: impl Into<String>, op: &str) -> Self {
        Self {
            spec: NodeSpec {
                name: name.into(),
                op: op.to_string(),
                inputs: Vec::new(),
                control_inputs: Vec::new(),
                attrs: BTreeMap::new(),
            },
        }
    }

    /// 名称待注册时由`finalize_with_new_name`分配
    pub fn anonymous(op: &str) -> Self {
        Self::new(String::new(), op)
    }

    /// 追加一条数据输入；传入`NodeId`时默认取其第0个输出
    pub fn input(mut self, input: impl Into<NodeOut>) -> Self {
        self.spec.inputs.push(input.into());
        self
    }

    pub fn inputs(mut self, inputs: impl IntoIterator<Item = NodeOut>) -> Self {
        self.spec.inputs.extend(inputs);
        self
    }

    pub fn control_input(mut self, id: NodeId) -> Self {
        self.spec.control_inputs.push(id);
        self
    }

    pub fn control_inputs(mut self, ids: &[NodeId]) -> Self {
        self.spec.control_inputs.extend_from_slice(ids);
        self
    }

    /// 设置属性，同名属性以最后一次为准
    pub fn attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.spec.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    pub fn into_spec(self) -> NodeSpec {
        self.spec
    }

    /// 校验并注册到图中，返回新节点的句柄；失败时图保持不变
    pub fn finalize(self, graph: &mut Graph) -> Result<NodeId, GraphError> {
        graph.add_node(self.spec)
    }

    /// 以`graph.new_name(prefix)`分配的名称注册；失败时连同名称计数器一起回退，图完全保持不变
    pub fn finalize_with_new_name(
        mut self,
        graph: &mut Graph,
        prefix: &str,
    ) -> Result<NodeId, GraphError> {
        let counter = graph.name_counter;
        self.spec.name = graph.new_name(prefix);
        let result = graph.add_node(self.spec);
        if result.is_err() {
            graph.name_counter = counter;
        }
        result
    }
}
