use crate::model::Id;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemModel {
    pub id: Id,
    pub interfaces: Vec<HttpInterface>,
}

impl SystemModel {
    /// Find an interface by ID
    pub fn get_interface(&self, interface_id: &str) -> Option<&HttpInterface> {
        self.interfaces.iter().find(|i| i.id == interface_id)
    }

    pub fn get_interface_mut(&mut self, interface_id: &str) -> Option<&mut HttpInterface> {
        self.interfaces.iter_mut().find(|i| i.id == interface_id)
    }

    /// Remove an interface by ID, returning it if it was present
    pub fn remove_interface(&mut self, interface_id: &str) -> Option<HttpInterface> {
        let pos = self.interfaces.iter().position(|i| i.id == interface_id)?;
        Some(self.interfaces.remove(pos))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpInterface {
    pub id: Id,
    pub domain: String,
    pub protocol: String,
    pub method: String,
    pub port: String,
    pub encoding: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub headers: Vec<String>,
    /// Unique within the system model
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<HttpParameter>,
}

impl HttpInterface {
    pub fn get_parameter(&self, parameter_id: &str) -> Option<&HttpParameter> {
        self.parameters.iter().find(|p| p.id == parameter_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpParameter {
    pub id: Id,
    pub name: String,
    #[serde(rename = "parameter-type")]
    pub kind: HttpParameterKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HttpParameterKind {
    ReqParam,
    UrlPart,
    Body,
    Header,
    Form,
}
