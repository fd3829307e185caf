/*
 * @Author       : 老董
 * @Date         : 2026-10-14
 * @Description  : Graph 的 Graphviz DOT 可视化
 */

use super::super::node::Node;
use super::super::types::InputSource;
use super::Graph;
use std::collections::BTreeSet;

impl Graph {
    // ========== Graphviz DOT 可视化 ==========

    /// 生成 Graphviz DOT 格式的图描述字符串
    ///
    /// 返回的字符串可用于在线预览：<https://dreampuf.github.io/GraphvizOnline/>
    ///
    /// # 样式
    /// - **Const/Variable**: 椭圆形，浅蓝色
    /// - **控制流节点**（Switch/Merge/Enter/Exit/NextIteration/LoopCond）: 菱形，浅黄色
    /// - **其它节点**: 圆角矩形
    /// - **数据边**: 实线，非第0个输出时标注槽位
    /// - **控制边**: 虚线
    /// - **未连接的输入**: 点线，起点为灰色的占位节点
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();

        // 图头部
        dot.push_str(&format!("digraph {} {{\n", Self::quote(&self.name)));
        dot.push_str("    rankdir=TB;\n");
        dot.push_str("    node [fontname=\"Microsoft YaHei,SimHei,Arial\"];\n");
        dot.push_str("    edge [fontname=\"Microsoft YaHei,SimHei,Arial\"];\n");
        dot.push('\n');

        for node in &self.nodes {
            dot.push_str(&format!(
                "    {} [label={}, {}];\n",
                Self::quote(node.name()),
                Self::quote(&format!("{}\n{}", node.name(), node.op())),
                Self::node_style(node)
            ));
        }

        // 只按名称引用的占位节点（去重）
        let pending_names: BTreeSet<&str> = self
            .nodes
            .iter()
            .flat_map(|node| node.inputs())
            .filter_map(|input| match &input.source {
                InputSource::Pending(name) => Some(name.as_str()),
                InputSource::Node(_) => None,
            })
            .collect();
        for name in &pending_names {
            dot.push_str(&format!(
                "    {} [label={}, shape=box, style=\"dotted,filled\", fillcolor=\"#EEEEEE\"];\n",
                Self::quote(&Self::pending_key(name)),
                Self::quote(&format!("{name}\n(未连接)"))
            ));
        }
        dot.push('\n');

        for node in &self.nodes {
            for input in node.inputs() {
                let (src, style) = match &input.source {
                    InputSource::Node(id) => match self.get_node_name(*id) {
                        Ok(name) => (name.to_string(), ""),
                        Err(_) => continue,
                    },
                    InputSource::Pending(name) => (Self::pending_key(name), "style=dotted"),
                };
                let mut attrs = Vec::new();
                if !style.is_empty() {
                    attrs.push(style.to_string());
                }
                if input.slot != 0 {
                    attrs.push(format!("label=\"{}\"", input.slot));
                }
                dot.push_str(&Self::edge_line(&src, node.name(), &attrs));
            }
            for &control in node.control_inputs() {
                if let Ok(src) = self.get_node_name(control) {
                    dot.push_str(&Self::edge_line(src, node.name(), &["style=dashed".to_string()]));
                }
            }
        }

        dot.push_str("}\n");
        dot
    }

    fn node_style(node: &Node) -> &'static str {
        match node.op() {
            "Const" | "Variable" => "shape=ellipse, style=filled, fillcolor=\"#BBDEFB\"",
            "Switch" | "Merge" | "Enter" | "Exit" | "NextIteration" | "LoopCond" => {
                "shape=diamond, style=filled, fillcolor=\"#FFF9C4\""
            }
            _ => "shape=box, style=rounded",
        }
    }

    fn edge_line(src: &str, dst: &str, attrs: &[String]) -> String {
        if attrs.is_empty() {
            format!("    {} -> {};\n", Self::quote(src), Self::quote(dst))
        } else {
            format!(
                "    {} -> {} [{}];\n",
                Self::quote(src),
                Self::quote(dst),
                attrs.join(", ")
            )
        }
    }

    fn pending_key(name: &str) -> String {
        format!("pending:{name}")
    }

    /// DOT 中的带引号标识符
    fn quote(s: &str) -> String {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n"))
    }
}
