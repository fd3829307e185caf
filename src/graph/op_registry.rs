/*
 * @Author       : 老董
 * @Date         : 2026-10-13
 * @Description  : 算子注册表：每种算子的输入/输出参数类型、属性及其默认值
 *
 * 注册节点时，图依据这里的定义推断类型属性（如`T`）、补全默认属性并做类型检查。
 * 注册表在首次使用时构建，之后只读。
 */

use super::attr::{AttrKind, AttrValue};
use super::error::GraphError;
use crate::tensor::DataType;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// 参数的类型来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// 固定类型
    Fixed(DataType),
    /// 由同名的`type`属性决定
    Attr(&'static str),
}

impl From<DataType> for ArgType {
    fn from(dtype: DataType) -> Self {
        Self::Fixed(dtype)
    }
}

impl From<&'static str> for ArgType {
    fn from(attr: &'static str) -> Self {
        Self::Attr(attr)
    }
}

/// 输入或输出参数
#[derive(Debug, Clone)]
pub struct ArgDef {
    pub name: &'static str,
    pub type_source: ArgType,
    pub is_ref: bool,
    /// 非空时该参数是由`number_attr`个同类型边组成的列表
    pub number_attr: Option<&'static str>,
}

/// `type`属性允许的取值范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowedTypes {
    Any,
    Numeric,
    RealNumber,
    Quantized,
    List(&'static [DataType]),
}

impl AllowedTypes {
    pub fn contains(self, dtype: DataType) -> bool {
        match self {
            Self::Any => true,
            Self::Numeric => dtype.is_numeric(),
            Self::RealNumber => dtype.is_real_number(),
            Self::Quantized => dtype.is_quantized(),
            Self::List(types) => types.contains(&dtype),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttrDef {
    pub name: &'static str,
    pub kind: AttrKind,
    pub default: Option<AttrValue>,
    pub allowed: AllowedTypes,
    pub minimum: Option<i64>,
}

/// 算子特有的额外校验（参数为补全默认值后的属性表）
pub type AttrValidator = fn(&BTreeMap<String, AttrValue>) -> Result<(), String>;

/// 一种算子的定义
#[derive(Debug, Clone)]
pub struct OpDef {
    pub name: &'static str,
    pub inputs: Vec<ArgDef>,
    pub outputs: Vec<ArgDef>,
    pub attrs: Vec<AttrDef>,
    pub validator: Option<AttrValidator>,
}

impl OpDef {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inputs: Vec::new(),
            outputs: Vec::new(),
            attrs: Vec::new(),
            validator: None,
        }
    }

    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓定义用的链式方法↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    fn arg(name: &'static str, ty: impl Into<ArgType>, is_ref: bool, number_attr: Option<&'static str>) -> ArgDef {
        ArgDef {
            name,
            type_source: ty.into(),
            is_ref,
            number_attr,
        }
    }

    fn input(mut self, name: &'static str, ty: impl Into<ArgType>) -> Self {
        self.inputs.push(Self::arg(name, ty, false, None));
        self
    }

    fn ref_input(mut self, name: &'static str, ty: impl Into<ArgType>) -> Self {
        self.inputs.push(Self::arg(name, ty, true, None));
        self
    }

    fn list_input(mut self, name: &'static str, ty: impl Into<ArgType>, number_attr: &'static str) -> Self {
        self.inputs.push(Self::arg(name, ty, false, Some(number_attr)));
        self.int_attr_min(number_attr, 1)
    }

    fn output(mut self, name: &'static str, ty: impl Into<ArgType>) -> Self {
        self.outputs.push(Self::arg(name, ty, false, None));
        self
    }

    fn ref_output(mut self, name: &'static str, ty: impl Into<ArgType>) -> Self {
        self.outputs.push(Self::arg(name, ty, true, None));
        self
    }

    fn attr(mut self, name: &'static str, kind: AttrKind) -> Self {
        self.attrs.push(AttrDef {
            name,
            kind,
            default: None,
            allowed: AllowedTypes::Any,
            minimum: None,
        });
        self
    }

    fn attr_default(mut self, name: &'static str, default: impl Into<AttrValue>) -> Self {
        let default = default.into();
        self.attrs.push(AttrDef {
            name,
            kind: default.kind(),
            default: Some(default),
            allowed: AllowedTypes::Any,
            minimum: None,
        });
        self
    }

    fn type_attr(mut self, name: &'static str, allowed: AllowedTypes) -> Self {
        self.attrs.push(AttrDef {
            name,
            kind: AttrKind::Type,
            default: None,
            allowed,
            minimum: None,
        });
        self
    }

    fn int_attr_min(mut self, name: &'static str, minimum: i64) -> Self {
        self.attrs.push(AttrDef {
            name,
            kind: AttrKind::Int,
            default: None,
            allowed: AllowedTypes::Any,
            minimum: Some(minimum),
        });
        self
    }

    fn validator(mut self, validator: AttrValidator) -> Self {
        self.validator = Some(validator);
        self
    }
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑定义用的链式方法↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

    pub fn attr_def(&self, name: &str) -> Option<&AttrDef> {
        self.attrs.iter().find(|def| def.name == name)
    }

    /// 不计列表参数时固定的输入个数
    pub fn num_fixed_inputs(&self) -> usize {
        self.inputs
            .iter()
            .filter(|arg| arg.number_attr.is_none())
            .count()
    }

    pub fn has_list_input(&self) -> bool {
        self.inputs.iter().any(|arg| arg.number_attr.is_some())
    }
}

/// 算子注册表
pub struct OpRegistry {
    ops: HashMap<&'static str, OpDef>,
}

impl OpRegistry {
    /// 进程内共享的只读注册表
    pub fn global() -> &'static Self {
        static REGISTRY: OnceLock<OpRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::with_builtin_ops)
    }

    pub fn lookup(&self, op: &str) -> Result<&OpDef, GraphError> {
        self.ops
            .get(op)
            .ok_or_else(|| GraphError::OpNotRegistered(op.to_string()))
    }

    pub fn is_registered(&self, op: &str) -> bool {
        self.ops.contains_key(op)
    }

    /// 按字母序返回所有已注册的算子名
    pub fn op_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.ops.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn register(&mut self, op_def: OpDef) {
        debug_assert!(
            op_def.inputs.iter().filter(|arg| arg.number_attr.is_some()).count() <= 1,
            "算子{}至多只能有一个列表输入",
            op_def.name
        );
        self.ops.insert(op_def.name, op_def);
    }

    fn with_builtin_ops() -> Self {
        use AllowedTypes::{Any, List, Numeric, Quantized, RealNumber};
        use DataType::{Bool, Complex64, Double, Float, Int32, Int64};

        let mut registry = Self {
            ops: HashMap::new(),
        };

        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓跨设备收发↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        registry.register(
            OpDef::new("_Send")
                .input("tensor", "T")
                .type_attr("T", Any)
                .attr("tensor_name", AttrKind::String)
                .attr("send_device", AttrKind::String)
                .attr("send_device_incarnation", AttrKind::Int)
                .attr("recv_device", AttrKind::String)
                .attr_default("client_terminated", false),
        );
        registry.register(
            OpDef::new("_Recv")
                .output("tensor", "tensor_type")
                .type_attr("tensor_type", Any)
                .attr("tensor_name", AttrKind::String)
                .attr("send_device", AttrKind::String)
                .attr("send_device_incarnation", AttrKind::Int)
                .attr("recv_device", AttrKind::String)
                .attr_default("client_terminated", false),
        );
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑跨设备收发↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓常量与变量↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        registry.register(
            OpDef::new("Const")
                .output("output", "dtype")
                .attr("value", AttrKind::Tensor)
                .type_attr("dtype", Any)
                .validator(validate_const),
        );
        registry.register(
            OpDef::new("Variable")
                .ref_output("ref", "dtype")
                .attr("shape", AttrKind::Shape)
                .type_attr("dtype", Any)
                .attr_default("container", "")
                .attr_default("shared_name", ""),
        );
        registry.register(
            OpDef::new("Assign")
                .ref_input("ref", "T")
                .input("value", "T")
                .ref_output("output_ref", "T")
                .type_attr("T", Any)
                .attr_default("validate_shape", true)
                .attr_default("use_locking", true),
        );
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑常量与变量↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓数学运算↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        for op in ["Sum", "Prod", "Min", "Max", "Mean"] {
            registry.register(
                OpDef::new(op)
                    .input("input", "T")
                    .input("reduction_indices", Int32)
                    .output("output", "T")
                    .attr_default("keep_dims", false)
                    .type_attr("T", Numeric),
            );
        }
        for op in ["All", "Any"] {
            registry.register(
                OpDef::new(op)
                    .input("input", Bool)
                    .input("reduction_indices", Int32)
                    .output("output", Bool)
                    .attr_default("keep_dims", false),
            );
        }
        registry.register(
            OpDef::new("Quantize")
                .input("input", Float)
                .output("output", "T")
                .type_attr("T", Quantized)
                .attr("min_range", AttrKind::Float)
                .attr("max_range", AttrKind::Float),
        );
        registry.register(
            OpDef::new("MatMul")
                .input("a", "T")
                .input("b", "T")
                .output("product", "T")
                .attr_default("transpose_a", false)
                .attr_default("transpose_b", false)
                .type_attr("T", List(&[Float, Double, Int32, Complex64])),
        );
        for op in ["RandomUniform", "RandomStandardNormal", "RandomParameters"] {
            registry.register(
                OpDef::new(op)
                    .input("shape", "T")
                    .output("output", "dtype")
                    .attr_default("seed", 0i64)
                    .attr_default("seed2", 0i64)
                    .type_attr("dtype", List(&[Float, Double]))
                    .type_attr("T", List(&[Int32, Int64])),
            );
        }
        for op in [
            "Identity", "Neg", "Abs", "Square", "Sqrt", "Exp", "Log", "Tanh", "Sigmoid",
        ] {
            registry.register(
                OpDef::new(op)
                    .input("x", "T")
                    .output("y", "T")
                    .type_attr("T", Any),
            );
        }
        for op in ["Add", "Sub", "Mul", "Div", "Maximum", "Minimum"] {
            registry.register(
                OpDef::new(op)
                    .input("x", "T")
                    .input("y", "T")
                    .output("z", "T")
                    .type_attr("T", Numeric),
            );
        }
        for op in ["Less", "LessEqual", "Greater", "GreaterEqual"] {
            registry.register(
                OpDef::new(op)
                    .input("x", "T")
                    .input("y", "T")
                    .output("z", Bool)
                    .type_attr("T", RealNumber),
            );
        }
        for op in ["Equal", "NotEqual"] {
            registry.register(
                OpDef::new(op)
                    .input("x", "T")
                    .input("y", "T")
                    .output("z", Bool)
                    .type_attr("T", Any),
            );
        }
        registry.register(
            OpDef::new("AddN")
                .list_input("inputs", "T", "N")
                .output("sum", "T")
                .type_attr("T", Numeric),
        );
        registry.register(
            OpDef::new("Cast")
                .input("x", "SrcT")
                .output("y", "DstT")
                .type_attr("SrcT", Any)
                .type_attr("DstT", Any),
        );
        registry.register(
            OpDef::new("Select")
                .input("condition", Bool)
                .input("t", "T")
                .input("e", "T")
                .output("output", "T")
                .type_attr("T", Any),
        );
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑数学运算↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓测试专用算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        registry.register(
            OpDef::new("Error")
                .input("in", "T")
                .output("out", "T")
                .type_attr("T", Any)
                .attr("message", AttrKind::String),
        );
        registry.register(
            OpDef::new("InvalidRefType")
                .ref_output("out", "TOut")
                .type_attr("TIn", Any)
                .type_attr("TOut", Any),
        );
        registry.register(
            OpDef::new("Delay")
                .input("in", "T")
                .output("out", "T")
                .type_attr("T", Any)
                .attr("micros", AttrKind::Int),
        );
        registry.register(OpDef::new("NoOp"));
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑测试专用算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

        /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓控制流↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
        registry.register(
            OpDef::new("Switch")
                .input("data", "T")
                .input("pred", Bool)
                .output("output_false", "T")
                .output("output_true", "T")
                .type_attr("T", Any),
        );
        registry.register(
            OpDef::new("Merge")
                .list_input("inputs", "T", "N")
                .output("output", "T")
                .output("value_index", Int32)
                .type_attr("T", Any),
        );
        registry.register(
            OpDef::new("Enter")
                .input("data", "T")
                .output("output", "T")
                .type_attr("T", Any)
                .attr("frame_name", AttrKind::String)
                .attr_default("is_constant", false)
                .attr_default("parallel_iterations", 10i64),
        );
        for op in ["Exit", "NextIteration"] {
            registry.register(
                OpDef::new(op)
                    .input("data", "T")
                    .output("output", "T")
                    .type_attr("T", Any),
            );
        }
        registry.register(
            OpDef::new("LoopCond")
                .input("input", Bool)
                .output("output", Bool),
        );
        /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑控制流↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/

        registry
    }
}

/// `Const`的`value`张量类型须与`dtype`一致
fn validate_const(attrs: &BTreeMap<String, AttrValue>) -> Result<(), String> {
    let value = attrs.get("value").and_then(AttrValue::as_tensor);
    let dtype = attrs.get("dtype").and_then(AttrValue::as_type);
    match (value, dtype) {
        (Some(value), Some(dtype)) if value.dtype() != dtype => Err(format!(
            "常量张量的类型{}与属性dtype={}不一致",
            value.dtype(),
            dtype
        )),
        _ => Ok(()),
    }
}
