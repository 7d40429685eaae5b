//! 订单模块 - 订单生命周期与金额计算
//!
//! Every mutation runs in one SQLite transaction. Terminal orders
//! (`PAID`, `CANCELLED`) reject all changes with `OrderNotInProgress`.

pub mod money;
pub mod service;

pub use service::{
    add_line, apply_discount, cancel_order, get_detail, load_detail, open_order, pay_order,
    remove_line, set_line_status,
};
