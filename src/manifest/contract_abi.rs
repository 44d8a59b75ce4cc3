//! Contract ABI: the hash binding plus the declared entry point, methods,
//! and events.

use serde::{Deserialize, Serialize};

use crate::hash::UInt160;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub parameter_type: String,
}

impl ContractParameter {
    pub fn new(name: &str, parameter_type: &str) -> Self {
        Self {
            name: name.to_string(),
            parameter_type: parameter_type.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMethod {
    pub name: String,
    pub parameters: Vec<ContractParameter>,
    #[serde(rename = "returntype")]
    pub return_type: String,
}

impl Default for ContractMethod {
    fn default() -> Self {
        Self {
            name: "Main".to_string(),
            parameters: Vec::new(),
            return_type: "Any".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractEvent {
    pub name: String,
    pub parameters: Vec<ContractParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAbi {
    /// Script hash this ABI is bound to; must equal Hash160 of the script.
    pub hash: UInt160,
    #[serde(rename = "entryPoint")]
    pub entry_point: ContractMethod,
    pub methods: Vec<ContractMethod>,
    pub events: Vec<ContractEvent>,
}

impl ContractAbi {
    pub fn new(hash: UInt160) -> Self {
        Self {
            hash,
            entry_point: ContractMethod::default(),
            methods: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn get_method(&self, name: &str) -> Option<&ContractMethod> {
        self.methods.iter().find(|m| m.name == name)
    }
}
