//! Shared record types for integration tests.

use std::collections::HashMap;

use record_store_core::record;

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Person {
        pub id: String,
        pub name: String,
    }
}

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Employee {
        pub name: String,
        pub age: i64,
        pub salary: f64,
        pub is_manager: bool,
        pub skills: Vec<String>,
        pub manager: Option<String>,
    }
}

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Department {
        pub name: String,
        pub employees: Vec<Employee>,
        pub budget: [f64; 2],
    }
}

record! {
    #[derive(Debug, Clone, PartialEq)]
    pub struct Company {
        pub name: String,
        pub departments: Vec<Department>,
        pub staff: Vec<Vec<Person>>,
        pub salary_map: HashMap<String, f64>,
        pub founded: i64,
        pub public: bool,
    }
}

pub fn person(id: &str, name: &str) -> Person {
    Person {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn employee(name: &str, age: i64, manager: Option<&str>) -> Employee {
    Employee {
        name: name.to_string(),
        age,
        salary: 80000.5,
        is_manager: manager.is_none(),
        skills: vec!["go".to_string(), "rust".to_string()],
        manager: manager.map(str::to_string),
    }
}

pub fn company() -> Company {
    Company {
        name: "Acme Corp".to_string(),
        departments: vec![
            Department {
                name: "Engineering".to_string(),
                employees: vec![
                    employee("John Doe", 30, None),
                    employee("Jane Roe", 28, Some("John Doe")),
                ],
                budget: [1e6, 250000.75],
            },
            Department {
                name: "Sales".to_string(),
                employees: vec![employee("Max Moe", 45, None)],
                budget: [5e5, 0.5],
            },
        ],
        staff: vec![
            vec![person("1", "John Doe"), person("2", "Jane Roe")],
            vec![person("3", "Max Moe")],
        ],
        salary_map: HashMap::from([
            ("John Doe".to_string(), 120000.0),
            ("Jane Roe".to_string(), 95000.25),
        ]),
        founded: 1999,
        public: true,
    }
}
