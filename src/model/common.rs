pub type Id = String;
