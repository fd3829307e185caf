/*
 * @Author       : 老董
 * @Date         : 2026-10-15
 * @Description  : 测试用的图片段构造函数
 *
 * 每个函数在图中注册一个节点并返回其句柄，节点名按`Graph::new_name("n")`的规则自动分配
 * （`constant_named`和`next_iteration`除外）。构造失败时返回`GraphError`，图（包括名称计数器）保持不变。
 *
 * - basic.rs: 收发、常量、变量、测试专用算子、导出
 * - math.rs: 归约、矩阵乘、随机数、一元/二元/多元运算、类型转换
 * - control_flow.rs: Switch/Merge/Enter/Exit/NextIteration/LoopCond
 *
 * # 示例
 * ```ignore
 * use graph_testlib::testlib;
 *
 * let mut g = Graph::new();
 * let a = testlib::constant(&mut g, &Tensor::new(&[1.0, 2.0], &[2]))?;
 * let b = testlib::identity(&mut g, a, 0)?;
 * let graph_def = testlib::to_graph_def(&g)?;
 * ```
 */

mod basic;
mod control_flow;
mod math;

pub use basic::*;
pub use control_flow::*;
pub use math::*;

/// 自动命名时使用的前缀
const NAME_PREFIX: &str = "n";

#[cfg(test)]
mod tests;
