use fieldcheck::Record;

#[derive(Record)]
pub struct Signup {
    #[is("required,lower")]
    username: String,
    #[is(rules = "required,email", rename = "Email")]
    email: String,
    #[is("len>=8")]
    password: String,
    nickname: String,
}

fn main() {
    let mut signup = Signup {
        username: "MatRyer".to_string(),
        email: "mat@example.com".to_string(),
        password: "hunter2hunter2".to_string(),
        nickname: String::new(),
    };
    let problems = fieldcheck::validate(&mut signup).unwrap();
    assert!(problems.is_empty());
    let _ = &signup.nickname;
}
