/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 图中已注册的节点
 */

use super::attr::AttrValue;
use super::error::GraphError;
use super::types::{NodeId, NodeInput};
use crate::tensor::SlotType;
use std::collections::BTreeMap;
use std::fmt;

/// 已注册到图中的节点（注册后只读，只有未连接的输入可以通过`Graph::add_edge`补上）
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(in crate::graph) id: NodeId,
    pub(in crate::graph) name: String,
    pub(in crate::graph) op: String,
    pub(in crate::graph) attrs: BTreeMap<String, AttrValue>,
    pub(in crate::graph) inputs: Vec<NodeInput>,
    pub(in crate::graph) control_inputs: Vec<NodeId>,
    pub(in crate::graph) output_types: Vec<SlotType>,
}

impl Node {
    pub const fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 算子类型标签，如`Const`、`MatMul`
    pub fn op(&self) -> &str {
        &self.op
    }

    pub const fn attrs(&self) -> &BTreeMap<String, AttrValue> {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    pub fn inputs(&self) -> &[NodeInput] {
        &self.inputs
    }

    pub fn input(&self, index: usize) -> Option<&NodeInput> {
        self.inputs.get(index)
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn input_types(&self) -> Vec<SlotType> {
        self.inputs.iter().map(|input| input.dtype).collect()
    }

    pub fn control_inputs(&self) -> &[NodeId] {
        &self.control_inputs
    }

    pub fn output_types(&self) -> &[SlotType] {
        &self.output_types
    }

    pub fn num_outputs(&self) -> usize {
        self.output_types.len()
    }

    pub fn output_type(&self, slot: usize) -> Result<SlotType, GraphError> {
        self.output_types
            .get(slot)
            .copied()
            .ok_or_else(|| GraphError::InvalidOutputSlot {
                node: self.name.clone(),
                slot,
                num_outputs: self.output_types.len(),
            })
    }

    /// 是否还有未连接（只记录了名称）的输入
    pub fn has_pending_inputs(&self) -> bool {
        self.inputs.iter().any(NodeInput::is_pending)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "节点[id={}, name={}, op={}]", self.id, self.name, self.op)
    }
}
