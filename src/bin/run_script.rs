use jstest_runtime_v8::{
    EngineConfig, callback, convert_to_string, create_isolate, describe_error,
    enable_typed_arrays, execute_js, register_global_function,
};
use std::pin::pin;
use std::process::ExitCode;

/// Usage: run-script <file.js> [v8 flags...]
fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);

    let Some(path) = args.next() else {
        eprintln!("usage: run-script <file.js> [v8 flags...]");
        return ExitCode::from(2);
    };

    let source = match std::fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Failed to read {}: {}", path, err);
            return ExitCode::from(2);
        }
    };

    let config = args.fold(EngineConfig::default(), |config, flag| config.with_flag(flag));

    enable_typed_arrays();
    let mut isolate = create_isolate(&config);

    let scope = pin!(v8::HandleScope::new(&mut isolate));
    let mut scope = scope.init();
    let context = v8::Context::new(&scope, Default::default());
    let scope = &mut v8::ContextScope::new(&mut scope, context);

    let print = callback(|scope, args| {
        let mut parts = Vec::with_capacity(args.length() as usize);

        for i in 0..args.length() {
            parts.push(convert_to_string(scope, args.get(i)).unwrap_or_default());
        }

        println!("{}", parts.join(" "));
        v8::undefined(scope).into()
    });

    if let Err(err) = register_global_function(scope, "print", print) {
        eprintln!("Failed to register print(): {}", err);
        return ExitCode::FAILURE;
    }

    let tc = pin!(v8::TryCatch::new(scope));
    let mut tc = tc.init();

    match execute_js(&mut tc, &source, &path) {
        Some(result) => {
            if !result.is_undefined() {
                println!("{}", convert_to_string(&mut tc, result).unwrap_or_default());
            }

            ExitCode::SUCCESS
        }
        None => {
            let description = describe_error(&tc).unwrap_or_else(|err| err.to_string());
            eprintln!("{}", description);
            ExitCode::FAILURE
        }
    }
}
