use std::fmt;

#[derive(Debug, Clone)]
pub enum TrafficError {
    Config(String),
    Credentials(String),
    Transport(String),
    Store(String),
    WriteIntegrity(String),
    InvalidRange(String),
    Parse(String),
    Serialization(String),
    FileOperation(String),
}

impl TrafficError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            TrafficError::Config(_) => "E001",
            TrafficError::Credentials(_) => "E002",
            TrafficError::Transport(_) => "E003",
            TrafficError::Store(_) => "E004",
            TrafficError::WriteIntegrity(_) => "E005",
            TrafficError::InvalidRange(_) => "E006",
            TrafficError::Parse(_) => "E007",
            TrafficError::Serialization(_) => "E008",
            TrafficError::FileOperation(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            TrafficError::Config(_) => "Configuration Error",
            TrafficError::Credentials(_) => "Credentials Error",
            TrafficError::Transport(_) => "Transport Error",
            TrafficError::Store(_) => "Store Error",
            TrafficError::WriteIntegrity(_) => "Write Integrity Error",
            TrafficError::InvalidRange(_) => "Invalid Range",
            TrafficError::Parse(_) => "Parse Error",
            TrafficError::Serialization(_) => "Serialization Error",
            TrafficError::FileOperation(_) => "File Operation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            TrafficError::Config(msg) => msg,
            TrafficError::Credentials(msg) => msg,
            TrafficError::Transport(msg) => msg,
            TrafficError::Store(msg) => msg,
            TrafficError::WriteIntegrity(msg) => msg,
            TrafficError::InvalidRange(msg) => msg,
            TrafficError::Parse(msg) => msg,
            TrafficError::Serialization(msg) => msg,
            TrafficError::FileOperation(msg) => msg,
        }
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for TrafficError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TrafficError {}

// 便捷的构造函数
impl TrafficError {
    pub fn config<T: Into<String>>(msg: T) -> Self {
        TrafficError::Config(msg.into())
    }

    pub fn credentials<T: Into<String>>(msg: T) -> Self {
        TrafficError::Credentials(msg.into())
    }

    pub fn transport<T: Into<String>>(msg: T) -> Self {
        TrafficError::Transport(msg.into())
    }

    pub fn store<T: Into<String>>(msg: T) -> Self {
        TrafficError::Store(msg.into())
    }

    pub fn write_integrity<T: Into<String>>(msg: T) -> Self {
        TrafficError::WriteIntegrity(msg.into())
    }

    pub fn invalid_range<T: Into<String>>(msg: T) -> Self {
        TrafficError::InvalidRange(msg.into())
    }

    pub fn parse<T: Into<String>>(msg: T) -> Self {
        TrafficError::Parse(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        TrafficError::Serialization(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        TrafficError::FileOperation(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for TrafficError {
    fn from(err: std::io::Error) -> Self {
        TrafficError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TrafficError {
    fn from(err: serde_json::Error) -> Self {
        TrafficError::Serialization(err.to_string())
    }
}

impl From<ureq::Error> for TrafficError {
    fn from(err: ureq::Error) -> Self {
        TrafficError::Transport(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for TrafficError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        TrafficError::Credentials(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TrafficError>;
