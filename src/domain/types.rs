// ==========================================
// 啤酒厂运营系统 - 领域类型定义
// ==========================================
// 序列化格式: 小写字符串 (与数据库及前端表单一致)
// 取值来源: 原运营表单所用的西语枚举值
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 库存移动类型 (Movement Type)
// ==========================================
// entrada = 入库, salida = 出库
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    Entrada, // 入库
    Salida,  // 出库
}

impl MovementType {
    /// 转换为字符串 (用于数据库存储)
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entrada => "entrada",
            MovementType::Salida => "salida",
        }
    }

    /// 从数据库字符串解析
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "entrada" => Some(MovementType::Entrada),
            "salida" => Some(MovementType::Salida),
            _ => None,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 维护工单类型 (Maintenance Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceKind {
    Preventivo, // 预防性维护
    Correctivo, // 纠正性维护
}

impl MaintenanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceKind::Preventivo => "preventivo",
            MaintenanceKind::Correctivo => "correctivo",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "preventivo" => Some(MaintenanceKind::Preventivo),
            "correctivo" => Some(MaintenanceKind::Correctivo),
            _ => None,
        }
    }
}

impl fmt::Display for MaintenanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 维护工单状态 (Maintenance Status)
// ==========================================
// 状态机: abierta → en_proceso | cerrada | cancelada
//         en_proceso → cerrada | cancelada
//         cerrada / cancelada 为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Abierta,   // 已开立
    EnProceso, // 处理中
    Cerrada,   // 已关闭
    Cancelada, // 已取消
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Abierta => "abierta",
            MaintenanceStatus::EnProceso => "en_proceso",
            MaintenanceStatus::Cerrada => "cerrada",
            MaintenanceStatus::Cancelada => "cancelada",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "abierta" => Some(MaintenanceStatus::Abierta),
            "en_proceso" => Some(MaintenanceStatus::EnProceso),
            "cerrada" => Some(MaintenanceStatus::Cerrada),
            "cancelada" => Some(MaintenanceStatus::Cancelada),
            _ => None,
        }
    }

    /// 是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, MaintenanceStatus::Cerrada | MaintenanceStatus::Cancelada)
    }

    /// 状态转换是否合法
    pub fn can_transition_to(&self, target: MaintenanceStatus) -> bool {
        if *self == target {
            return false;
        }
        match self {
            MaintenanceStatus::Abierta => true,
            MaintenanceStatus::EnProceso => target.is_terminal(),
            MaintenanceStatus::Cerrada | MaintenanceStatus::Cancelada => false,
        }
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 工单优先级 (Priority)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Baja,  // 低
    Media, // 中
    Alta,  // 高
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Baja => "baja",
            Priority::Media => "media",
            Priority::Alta => "alta",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "baja" => Some(Priority::Baja),
            "media" => Some(Priority::Media),
            "alta" => Some(Priority::Alta),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_type_roundtrip() {
        assert_eq!(MovementType::parse("entrada"), Some(MovementType::Entrada));
        assert_eq!(MovementType::parse("salida"), Some(MovementType::Salida));
        assert_eq!(MovementType::parse("ajuste"), None);
    }

    #[test]
    fn test_maintenance_status_transitions() {
        use MaintenanceStatus::*;

        // abierta 可以到任意其他状态
        assert!(Abierta.can_transition_to(EnProceso));
        assert!(Abierta.can_transition_to(Cerrada));
        assert!(Abierta.can_transition_to(Cancelada));

        // en_proceso 只能到终态
        assert!(EnProceso.can_transition_to(Cerrada));
        assert!(EnProceso.can_transition_to(Cancelada));
        assert!(!EnProceso.can_transition_to(Abierta));

        // 终态不可再转换
        assert!(!Cerrada.can_transition_to(Abierta));
        assert!(!Cancelada.can_transition_to(EnProceso));

        // 原地转换非法
        assert!(!Abierta.can_transition_to(Abierta));
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Alta > Priority::Media);
        assert!(Priority::Media > Priority::Baja);
    }
}
