use json_cabinet::Cabinet;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Address {
    city: String,
    state: String,
    country: String,
    postcode: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct User {
    name: String,
    age: u32,
    contact: String,
    company: String,
    address: Address,
}

fn user(row: (&str, u32, &str, &str, &str, &str, u32)) -> User {
    let (name, age, contact, company, city, state, postcode) = row;
    User {
        name: name.into(),
        age,
        contact: contact.into(),
        company: company.into(),
        address: Address {
            city: city.into(),
            state: state.into(),
            country: "America".into(),
            postcode,
        },
    }
}

fn main() -> Result<(), json_cabinet::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let root = std::env::temp_dir().join("json_cabinet_demo");
    let db = Cabinet::open(&root)?;
    println!("json-cabinet {} at {}", json_cabinet::VERSION, db.root().display());

    let employees = [
        ("John", 23, "0123456789", "Google", "New York", "New York", 58200),
        ("Jim", 29, "0168426982", "Dunder Mifflin", "Scranton", "Pennsylvania", 42200),
        ("Dwight", 35, "0172698324", "Microsoft", "New York City", "New York", 68000),
        ("Michael", 40, "0136524856", "Netflix", "Silicon Valley", "California", 57100),
        ("Pam", 28, "0123652486", "Amazon", "Brooklyn", "New York", 52100),
    ];
    for row in employees {
        let u = user(row);
        db.write("users", &u.name, &u)?;
    }

    let records = db.read_all("users")?;
    println!("raw records:\n{}", records.concat());

    let all: Vec<User> = db.read_all_as("users")?;
    for u in &all {
        println!("{} ({}) works at {} in {}", u.name, u.age, u.company, u.address.city);
    }

    db.delete("users", "John")?;
    if let Err(e) = db.delete("users", "John") {
        println!("second delete: {e}");
    }

    db.delete_collection("users")?;
    Ok(())
}
