/// 動作環境を表す
#[derive(Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

/// 現在の動作環境を ENV 環境変数から判定する
pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match std::env::var("ENV") {
        Err(_) => default_env,
        Ok(v) => match v.as_str() {
            "production" => Environment::Production,
            _ => Environment::Development,
        },
    }
}
