// src/infrastructure/platforms/mod.rs
mod wechat;
mod xiaohongshu;
mod zhihu;

pub use wechat::WeChatPublisher;
pub use xiaohongshu::XiaohongshuPublisher;
pub use zhihu::ZhihuPublisher;
