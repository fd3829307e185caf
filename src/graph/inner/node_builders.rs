/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : Graph 节点注册：依据算子定义校验节点描述，通过后原子地写入图中
 */

use super::super::attr::AttrValue;
use super::super::error::GraphError;
use super::super::node::Node;
use super::super::node_builder::NodeSpec;
use super::super::op_registry::{ArgDef, ArgType, OpDef, OpRegistry};
use super::super::types::{InputSource, NodeId, NodeInput, NodeOut};
use super::Graph;
use crate::tensor::SlotType;
use std::collections::BTreeMap;

impl Graph {
    /// 注册一个节点
    ///
    /// 先完整地校验（名称、算子、输入数量与类型、属性），全部通过后才写入图，
    /// 因此返回`Err`时图中不会多出任何节点或边。
    pub fn add_node(&mut self, spec: NodeSpec) -> Result<NodeId, GraphError> {
        let node = self.validate_node_spec(spec)?;
        Ok(self.commit_node(node))
    }

    /// 把`dst`第`dst_input`个尚未连接的输入连到`src`的第`src_slot`个输出上
    ///
    /// 用于循环中`Merge`的回边：构建`Merge`时`NextIteration`还不存在，只能按名称占位。
    pub fn add_edge(
        &mut self,
        src: NodeId,
        src_slot: usize,
        dst: NodeId,
        dst_input: usize,
    ) -> Result<(), GraphError> {
        let src_type = self.node(src)?.output_type(src_slot)?;
        let dst_node = self.node(dst)?;
        let input = dst_node.input(dst_input).ok_or_else(|| {
            GraphError::InvalidArgument(format!(
                "{dst_node}没有第{dst_input}个输入（共{}个）",
                dst_node.num_inputs()
            ))
        })?;
        if !input.is_pending() {
            return Err(GraphError::InvalidOperation(format!(
                "{dst_node}的第{dst_input}个输入已经连接，不能重复连接"
            )));
        }
        if !Self::is_assignable(src_type, input.dtype) {
            return Err(GraphError::TypeMismatch {
                node: dst_node.name().to_string(),
                index: dst_input,
                expected: input.dtype,
                got: src_type,
            });
        }

        let node = self.node_mut(dst)?;
        node.inputs[dst_input] = NodeInput {
            source: InputSource::Node(src),
            slot: src_slot,
            dtype: src_type,
        };
        let children = self.forward_edges.entry(src).or_default();
        if !children.contains(&dst) {
            children.push(dst);
        }
        tracing::debug!(graph = %self.name, ?src, src_slot, ?dst, dst_input, "连接回边");
        Ok(())
    }

    /// 实际类型`got`能否作为声明类型`expected`的输入：元素类型一致，且引用输入必须来自引用输出
    pub(in crate::graph) fn is_assignable(got: SlotType, expected: SlotType) -> bool {
        got.dtype == expected.dtype && (got.is_ref || !expected.is_ref)
    }

    fn validate_node_spec(&self, spec: NodeSpec) -> Result<Node, GraphError> {
        let NodeSpec {
            name,
            op,
            inputs,
            control_inputs,
            mut attrs,
        } = spec;

        Self::check_node_name(&name)?;
        self.check_duplicate_node_name(&name)?;
        let op_def = OpRegistry::global().lookup(&op)?;

        // 1. 输入数量（列表参数吸收多出的输入）
        let num_fixed = op_def.num_fixed_inputs();
        let count_ok = if op_def.has_list_input() {
            inputs.len() >= num_fixed
        } else {
            inputs.len() == num_fixed
        };
        if !count_ok {
            return Err(GraphError::InputCountMismatch {
                node: name,
                op,
                expected: num_fixed,
                got: inputs.len(),
            });
        }
        let list_len = inputs.len() - num_fixed;

        // 2. 解析每条输入的实际类型
        let resolved = inputs
            .iter()
            .map(|input| self.resolve_node_out(input))
            .collect::<Result<Vec<_>, _>>()?;

        // 3. 按参数逐一检查输入类型，并推断类型属性
        let mut resolved_iter = resolved.iter().enumerate();
        for arg in &op_def.inputs {
            let count = match arg.number_attr {
                Some(number_attr) => {
                    Self::bind_attr(&mut attrs, &name, number_attr, AttrValue::I(list_len as i64))?;
                    list_len
                }
                None => 1,
            };
            for (index, input) in resolved_iter.by_ref().take(count) {
                Self::check_input_type(&mut attrs, &name, arg, index, input.dtype)?;
            }
        }

        // 4. 控制输入（去重，保留先后顺序）
        let mut unique_control_inputs = Vec::with_capacity(control_inputs.len());
        for id in control_inputs {
            let _ = self.node(id)?;
            if !unique_control_inputs.contains(&id) {
                unique_control_inputs.push(id);
            }
        }

        // 5. 属性：补全默认值并逐项检查
        Self::check_attrs(&mut attrs, &name, op_def)?;

        // 6. 算子特有的校验
        if let Some(validator) = op_def.validator {
            validator(&attrs)
                .map_err(|msg| GraphError::InvalidArgument(format!("节点`{name}`：{msg}")))?;
        }

        // 7. 输出类型
        let output_types = op_def
            .outputs
            .iter()
            .map(|arg| Self::resolve_arg_type(&attrs, &name, arg))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Node {
            id: NodeId(self.nodes.len()),
            name,
            op,
            attrs,
            inputs: resolved,
            control_inputs: unique_control_inputs,
            output_types,
        })
    }

    fn commit_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        let producers = node
            .inputs
            .iter()
            .filter_map(NodeInput::node_id)
            .chain(node.control_inputs.iter().copied());
        for producer in producers {
            let children = self.forward_edges.entry(producer).or_default();
            if !children.contains(&id) {
                children.push(id);
            }
        }
        tracing::debug!(
            graph = %self.name,
            node = %node.name,
            op = %node.op,
            inputs = node.inputs.len(),
            control_inputs = node.control_inputs.len(),
            "注册节点"
        );
        self.name_index.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    fn resolve_node_out(&self, input: &NodeOut) -> Result<NodeInput, GraphError> {
        match input {
            NodeOut::Node { id, index } => {
                let dtype = self.node(*id)?.output_type(*index)?;
                Ok(NodeInput {
                    source: InputSource::Node(*id),
                    slot: *index,
                    dtype,
                })
            }
            NodeOut::Named { name, index, dtype } => {
                Self::check_node_name(name)?;
                Ok(NodeInput {
                    source: InputSource::Pending(name.clone()),
                    slot: *index,
                    dtype: *dtype,
                })
            }
        }
    }

    /// 设置由输入推断出的属性；若已存在则必须一致
    fn bind_attr(
        attrs: &mut BTreeMap<String, AttrValue>,
        node: &str,
        attr: &str,
        value: AttrValue,
    ) -> Result<(), GraphError> {
        match attrs.get(attr) {
            Some(existing) if *existing != value => Err(GraphError::InconsistentAttr {
                node: node.to_string(),
                attr: attr.to_string(),
                first: existing.to_string(),
                second: value.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                attrs.insert(attr.to_string(), value);
                Ok(())
            }
        }
    }

    fn check_input_type(
        attrs: &mut BTreeMap<String, AttrValue>,
        node: &str,
        arg: &ArgDef,
        index: usize,
        got: SlotType,
    ) -> Result<(), GraphError> {
        let type_mismatch = |expected| GraphError::TypeMismatch {
            node: node.to_string(),
            index,
            expected,
            got,
        };
        match arg.type_source {
            ArgType::Fixed(dtype) => {
                if dtype != got.dtype {
                    return Err(type_mismatch(SlotType { dtype, is_ref: arg.is_ref }));
                }
            }
            ArgType::Attr(attr) => {
                Self::bind_attr(attrs, node, attr, AttrValue::Type(got.dtype))?;
            }
        }
        if arg.is_ref && !got.is_ref {
            return Err(type_mismatch(got.dtype.as_ref_type()));
        }
        Ok(())
    }

    fn check_attrs(
        attrs: &mut BTreeMap<String, AttrValue>,
        node: &str,
        op_def: &OpDef,
    ) -> Result<(), GraphError> {
        if let Some(unknown) = attrs.keys().find(|key| op_def.attr_def(key).is_none()) {
            return Err(GraphError::UnknownAttr {
                node: node.to_string(),
                op: op_def.name.to_string(),
                attr: unknown.clone(),
            });
        }

        for def in &op_def.attrs {
            if !attrs.contains_key(def.name) {
                let default = def.default.clone().ok_or_else(|| GraphError::MissingAttr {
                    node: node.to_string(),
                    attr: def.name.to_string(),
                })?;
                attrs.insert(def.name.to_string(), default);
            }
            let Some(value) = attrs.get(def.name) else {
                continue;
            };

            if value.kind() != def.kind {
                return Err(GraphError::AttrKindMismatch {
                    node: node.to_string(),
                    attr: def.name.to_string(),
                    expected: def.kind.name(),
                    got: value.kind().name(),
                });
            }
            if let Some(dtype) = value.as_type() {
                if !def.allowed.contains(dtype) {
                    return Err(GraphError::DisallowedType {
                        node: node.to_string(),
                        attr: def.name.to_string(),
                        dtype,
                    });
                }
            }
            if let (Some(minimum), Some(actual)) = (def.minimum, value.as_int()) {
                if actual < minimum {
                    return Err(GraphError::InvalidArgument(format!(
                        "节点`{node}`的属性`{}`须≥{minimum}，实际为{actual}",
                        def.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn resolve_arg_type(
        attrs: &BTreeMap<String, AttrValue>,
        node: &str,
        arg: &ArgDef,
    ) -> Result<SlotType, GraphError> {
        let dtype = match arg.type_source {
            ArgType::Fixed(dtype) => dtype,
            ArgType::Attr(attr) => attrs
                .get(attr)
                .and_then(AttrValue::as_type)
                .ok_or_else(|| GraphError::MissingAttr {
                    node: node.to_string(),
                    attr: attr.to_string(),
                })?,
        };
        Ok(SlotType {
            dtype,
            is_ref: arg.is_ref,
        })
    }
}
