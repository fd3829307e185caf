/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : 图描述符（GraphDef）
 *                 可移植的图结构描述，用于导出、重建、持久化和调试输出
 */

use super::attr::AttrValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 图的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDef {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// 图名称
    pub name: String,
    /// 按注册顺序排列的所有节点
    pub node: Vec<NodeDef>,
}

/// 节点描述
///
/// `input`中的每一项为`"name"`（第0个输出）、`"name:k"`（第k个输出）
/// 或`"^name"`（控制输入），控制输入排在数据输入之后。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub name: String,
    pub op: String,
    #[serde(default)]
    pub input: Vec<String>,
    #[serde(default)]
    pub attr: BTreeMap<String, AttrValue>,
}

/// 解析后的一项输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRef<'a> {
    Data { name: &'a str, slot: usize },
    Control { name: &'a str },
}

impl<'a> InputRef<'a> {
    pub fn parse(input: &'a str) -> Self {
        if let Some(name) = input.strip_prefix('^') {
            return Self::Control { name };
        }
        match input.rsplit_once(':') {
            Some((name, slot)) => match slot.parse::<usize>() {
                Ok(slot) => Self::Data { name, slot },
                Err(_) => Self::Data {
                    name: input,
                    slot: 0,
                },
            },
            None => Self::Data {
                name: input,
                slot: 0,
            },
        }
    }

    pub const fn name(&self) -> &'a str {
        match self {
            Self::Data { name, .. } | Self::Control { name } => *name,
        }
    }
}

impl GraphDef {
    /// 创建新的图描述符
    pub fn new(name: &str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: name.to_string(),
            node: Vec::new(),
        }
    }

    /// 添加节点描述
    pub fn add_node(&mut self, node: NodeDef) {
        self.node.push(node);
    }

    pub fn find_node(&self, name: &str) -> Option<&NodeDef> {
        self.node.iter().find(|n| n.name == name)
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 转换为紧凑的二进制格式
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// 从二进制格式解析
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

impl NodeDef {
    pub fn new(name: &str, op: &str) -> Self {
        Self {
            name: name.to_string(),
            op: op.to_string(),
            input: Vec::new(),
            attr: BTreeMap::new(),
        }
    }

    /// 解析所有输入项
    pub fn input_refs(&self) -> impl Iterator<Item = InputRef<'_>> {
        self.input.iter().map(|input| InputRef::parse(input))
    }
}
